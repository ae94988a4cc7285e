use fit_mi::DebuggerAdapter;
use fit_mi::adapter::GdbLaunchConfig;
use fit_mi::transport::ScriptedTransport;
use fit_target::TargetSurface;
use fit_types::campaign_config::{BoardFamily, GdbConfig};

fn config() -> GdbLaunchConfig {
    GdbLaunchConfig {
        executable: "target.elf".to_string(),
        gdb: GdbConfig {
            gdb_path: "gdb".to_string(),
            embedded: false,
            board_family: BoardFamily::Unknown,
            remote: None,
        },
    }
}

fn booted_adapter() -> DebuggerAdapter<ScriptedTransport> {
    let mut t = ScriptedTransport::new();
    t.push_lines(&[r#"^done"#]);
    t.push_lines(&[r#"^done,register-names=["rax"]"#]);
    t.push_lines(&[r#"=breakpoint-deleted,id="1""#]);
    DebuggerAdapter::new(t, &config()).unwrap()
}

/// spec.md §8 scenario 3: writing `[0x2_00000001, 2, 3]` to a 12-byte range
/// then reading it back word by word.
#[test]
fn range_write_then_individual_word_reads_round_trip() {
    let mut adapter = booted_adapter();
    adapter.transport_mut().push_lines(&[r#"^done"#]); // write_range
    {
        let mut surface = TargetSurface::new(&mut adapter, 4);
        surface.write_range(0x3000, 0x300C, None, &[1, 2, 3]).unwrap();
    }

    adapter.transport_mut().push_lines(&[
        r#"^done,memory=[{begin="0x3000",end="0x3004",offset="0x0",contents="01000000"}]"#,
    ]);
    adapter.transport_mut().push_lines(&[
        r#"^done,memory=[{begin="0x3004",end="0x3008",offset="0x0",contents="02000000"}]"#,
    ]);
    adapter.transport_mut().push_lines(&[
        r#"^done,memory=[{begin="0x3008",end="0x300c",offset="0x0",contents="03000000"}]"#,
    ]);

    let mut surface = TargetSurface::new(&mut adapter, 4);
    assert_eq!(surface.read_word(0x3000).unwrap(), 1);
    assert_eq!(surface.read_word(0x3004).unwrap(), 2);
    assert_eq!(surface.read_word(0x3008).unwrap(), 3);
}

/// spec.md §8 scenario 4: pointwise XOR over a range, expressed here as a
/// range write of the already-xored words (C5/C4 split the sampling from
/// the write; this test only exercises the Target Surface's write half).
#[test]
fn pointwise_write_over_range_matches_expected_words() {
    let mut adapter = booted_adapter();
    adapter.transport_mut().push_lines(&[r#"^done"#]);
    let mut surface = TargetSurface::new(&mut adapter, 4);
    surface.write_range(0x4000, 0x400C, None, &[0xFFFF_FFF0, 0x0000_000F, 0xFFFF_FFF0]).unwrap();
}
