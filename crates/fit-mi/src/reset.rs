//! Reset sequences (spec.md §4.3 "Reset"): hosted vs. embedded, with
//! board-family-specific polling for STM32.

use std::thread::sleep;
use std::time::Duration;

use fit_types::campaign_config::BoardFamily;

use crate::error::AdapterError;
use crate::matcher::{Expected, check_any, is_error_record};
use crate::transport::Transport;
use crate::value::MiMessage;

/// Address of the Debug Halting Control and Status Register on Cortex-M
/// parts; bit 25 is `S_RESET_ST` (spec.md §9: "flagged as possibly
/// non-portable... treat as STM32-specific").
const DHCSR_ADDRESS: u64 = 0xE000_EDF0;
const DHCSR_S_RESET_ST_BIT: u32 = 25;

const DHCSR_POLL_INTERVAL: Duration = Duration::from_millis(500);
const UNKNOWN_BOARD_SETTLE: Duration = Duration::from_secs(1);

/// Drive one MI command to completion, returning the accumulated responses
/// up to (and including) a message matching any of `wait_for`. Fails on an
/// `^error` record.
fn write_and_await(
    transport: &mut dyn Transport,
    command: &str,
    wait_for: &[Expected],
) -> Result<Vec<MiMessage>, AdapterError> {
    transport.send(command)?;
    let mut acc = Vec::new();
    loop {
        let batch = transport.poll(None)?;
        for msg in &batch {
            if is_error_record(msg) {
                return Err(AdapterError::MiError(msg["payload"].clone()));
            }
        }
        acc.extend(batch.iter().cloned());
        if acc.iter().any(|m| check_any(m, wait_for)) {
            return Ok(acc);
        }
    }
}

/// Hosted reset: `start`, waiting for the temporary entry breakpoint's
/// `breakpoint-deleted` notification (spec.md §4.3).
pub fn reset_hosted(transport: &mut dyn Transport) -> Result<(), AdapterError> {
    write_and_await(
        transport,
        "-interpreter-exec console \"start\"",
        &[Expected::new(serde_json::json!({"message": "breakpoint-deleted"}))],
    )?;
    Ok(())
}

/// Embedded reset: `-target-reset`, then a board-family-specific sequence.
pub fn reset_embedded(transport: &mut dyn Transport, board_family: BoardFamily) -> Result<(), AdapterError> {
    write_and_await(
        transport,
        "-target-reset",
        &[Expected::new(serde_json::json!({"message": "done"}))],
    )?;

    match board_family {
        BoardFamily::Stm32 => reset_stm32(transport),
        BoardFamily::Unknown => reset_unknown_board(transport),
    }
}

fn reset_stm32(transport: &mut dyn Transport) -> Result<(), AdapterError> {
    write_and_await(
        transport,
        "-interpreter-exec console \"monitor jtag_reset\"",
        &[Expected::new(serde_json::json!({"message": "done"}))],
    )?;

    loop {
        let words = read_dhcsr(transport)?;
        if words & (1 << DHCSR_S_RESET_ST_BIT) != 0 {
            return Ok(());
        }
        sleep(DHCSR_POLL_INTERVAL);
    }
}

fn read_dhcsr(transport: &mut dyn Transport) -> Result<u64, AdapterError> {
    let responses = write_and_await(
        transport,
        &format!("-data-read-memory-bytes {DHCSR_ADDRESS:#x} 4"),
        &[Expected::new(serde_json::json!({"message": "done"}))],
    )?;

    let done = responses
        .iter()
        .find(|m| m["message"] == "done")
        .ok_or_else(|| AdapterError::MalformedLine("no done record reading DHCSR".to_string()))?;

    let chunks = crate::memory::chunks_from_payload(&done["payload"]["memory"])?;
    let (words, _missing) =
        crate::memory::parse_chunks(&chunks, DHCSR_ADDRESS, 4, 4, crate::memory::Endianness::Little);
    Ok(*words.first().unwrap_or(&0))
}

fn reset_unknown_board(transport: &mut dyn Transport) -> Result<(), AdapterError> {
    write_and_await(
        transport,
        "-interpreter-exec console \"monitor reset\"",
        &[Expected::new(serde_json::json!({"message": "done"}))],
    )?;
    sleep(UNKNOWN_BOARD_SETTLE);
    Ok(())
}
