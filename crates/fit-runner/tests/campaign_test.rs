//! End-to-end `RunController` coverage over a scripted transport: a golden
//! run, one injected iteration (non-blocking poll finds nothing, interrupt
//! lands on an ordinary signal stop, injection applies, blocking resume
//! hits the named breakpoint), and a separate timeout/cancellation path.

use fit_campaign::CampaignEngine;
use fit_mi::DebuggerAdapter;
use fit_mi::adapter::GdbLaunchConfig;
use fit_mi::transport::ScriptedTransport;
use fit_runner::{RunController, VecSink};
use fit_target::symbol::StaticSymbolTable;
use fit_types::campaign_config::{BoardFamily, CampaignConfig, CampaignRow, GdbConfig, InjectionDelay};
use fit_types::{Operation, RunResult};

fn launch_config() -> GdbLaunchConfig {
    GdbLaunchConfig {
        executable: "target.elf".to_string(),
        gdb: GdbConfig { gdb_path: "gdb".to_string(), embedded: false, board_family: BoardFamily::Unknown, remote: None },
    }
}

fn booted_adapter() -> DebuggerAdapter<ScriptedTransport> {
    let mut t = ScriptedTransport::new();
    t.push_lines(&[r#"^done"#]); // mi-async on
    t.push_lines(&[r#"^done,register-names=["rax"]"#]); // register names
    t.push_lines(&[r#"=breakpoint-deleted,id="1""#]); // construction's own reset()
    DebuggerAdapter::new(t, &launch_config()).unwrap()
}

fn single_word_config(number_of_runs: u64, timeout_ms: u64) -> CampaignConfig {
    CampaignConfig {
        executable: "target.elf".to_string(),
        injector: vec![CampaignRow {
            target_text: "0x2000".to_string(),
            operation: Operation::Xor,
            operation_probability: 1.0,
            value: 0xFF,
            value_probability: 1.0,
        }],
        golden_result_condition: "golden_stop".to_string(),
        result_condition: vec![],
        number_of_runs,
        timeout_ms,
        injection_delay: InjectionDelay { min_ms: 0, max_ms: 0 },
        experiment_name: "scripted".to_string(),
        gdb: GdbConfig { gdb_path: "gdb".to_string(), embedded: false, board_family: BoardFamily::Unknown, remote: None },
        seed: Some(1),
    }
}

fn memory_chunk(addr: &str, end: &str, contents: &str) -> String {
    format!(r#"^done,memory=[{{begin="{addr}",end="{end}",offset="0x0",contents="{contents}"}}]"#)
}

#[test]
fn golden_run_then_one_injected_iteration_produces_matching_key_sets() {
    let mut adapter = booted_adapter();
    let config = single_word_config(1, 1000);
    let resolver = StaticSymbolTable::new();
    let mut emitter = fit_campaign::BufferEmitter::default();
    let engine = CampaignEngine::new(&config, &[], &mut emitter).unwrap();

    // -- golden run --
    adapter.transport_mut().push_lines(&[r#"=breakpoint-deleted,id="2""#]); // reset
    adapter.transport_mut().push_lines(&[r#"^done,bkpt={number="1",addr="0x4000"}"#]); // set_event golden_stop
    adapter.transport_mut().push_lines(&[r#"*stopped,reason="breakpoint-hit",bkptno="1""#]); // run(true)
    adapter.transport_mut().push_lines(&[memory_chunk("0x2000", "0x2004", "00000000").as_str()]); // snapshot read

    // -- injected iteration --
    adapter.transport_mut().push_lines(&[r#"=breakpoint-deleted,id="3""#]); // reset
    adapter.transport_mut().push_lines(&[r#"^done,bkpt={number="1",addr="0x4000"}"#]); // set_event golden_stop
    adapter.transport_mut().push_lines(&[r#"*stopped,reason="signal-received""#]); // interrupt: ordinary stop
    adapter.transport_mut().push_lines(&[memory_chunk("0x2000", "0x2004", "00000000").as_str()]); // inject's read
    adapter.transport_mut().push_lines(&[r#"^done"#]); // inject's write
    adapter.transport_mut().push_lines(&[r#"*stopped,reason="breakpoint-hit",bkptno="1""#]); // run(true)
    adapter.transport_mut().push_lines(&[memory_chunk("0x2000", "0x2004", "ff000000").as_str()]); // snapshot read

    let mut controller = RunController::new(&mut adapter, &resolver, engine, 4);
    let mut sink = VecSink::default();
    let result = controller.run_campaign(&config, &mut sink).unwrap();

    assert_eq!(result.golden.result, "golden_stop");
    assert_eq!(result.golden.observed.get("0x2000"), Some(&RunResult::Scalar(0)));

    assert_eq!(result.runs.len(), 1);
    let run = &result.runs[0];
    assert_eq!(run.result, "golden_stop");
    assert_eq!(run.observed.get("0x2000"), Some(&RunResult::Scalar(0xFF)));
    assert!(run.check_key_set_matches(&result.golden).is_ok());

    assert_eq!(sink.records.len(), 2);
    assert_eq!(sink.records[0].result, "golden_stop");
    assert_eq!(sink.records[1].observed.get("0x2000"), Some(&RunResult::Scalar(0xFF)));
}

#[test]
fn golden_run_timeout_forces_an_interrupt_and_labels_the_record_timeout() {
    let mut adapter = booted_adapter();
    let config = single_word_config(1, 0);
    let resolver = StaticSymbolTable::new();
    let mut emitter = fit_campaign::BufferEmitter::default();
    let engine = CampaignEngine::new(&config, &[], &mut emitter).unwrap();

    // -- golden run: blocking run() never sees a stop before its deadline --
    adapter.transport_mut().push_lines(&[r#"=breakpoint-deleted,id="2""#]); // reset
    adapter.transport_mut().push_lines(&[r#"^done,bkpt={number="1",addr="0x4000"}"#]); // set_event
    adapter.transport_mut().push_lines(&[r#"*stopped,reason="signal-received""#]); // forced interrupt() after timeout
    adapter.transport_mut().push_lines(&[memory_chunk("0x2000", "0x2004", "00000000").as_str()]); // snapshot read

    let mut controller = RunController::new(&mut adapter, &resolver, engine, 4);
    let mut sink = VecSink::default();

    // Only the golden run needs to run to observe the timeout path; drop the
    // configured iteration count to zero runs worth of further scripting by
    // asserting straight after the golden record is built would require a
    // private hook, so instead we drive the full (one-run) campaign and
    // script its injected iteration identically to the happy-path test.
    adapter.transport_mut().push_lines(&[r#"=breakpoint-deleted,id="3""#]); // reset
    adapter.transport_mut().push_lines(&[r#"^done,bkpt={number="1",addr="0x4000"}"#]); // set_event
    adapter.transport_mut().push_lines(&[r#"*stopped,reason="signal-received""#]); // interrupt: ordinary stop
    adapter.transport_mut().push_lines(&[memory_chunk("0x2000", "0x2004", "00000000").as_str()]); // inject's read
    adapter.transport_mut().push_lines(&[r#"^done"#]); // inject's write
    adapter.transport_mut().push_lines(&[r#"*stopped,reason="signal-received""#]); // second timeout's forced interrupt
    adapter.transport_mut().push_lines(&[memory_chunk("0x2000", "0x2004", "ff000000").as_str()]); // snapshot read

    let result = controller.run_campaign(&config, &mut sink).unwrap();

    assert_eq!(result.golden.result, "Timeout");
    assert_eq!(result.runs.len(), 1);
    assert_eq!(result.runs[0].result, "Timeout");
}
