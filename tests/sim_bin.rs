use std::process::Command;

#[test]
fn sim_binary_smoke() {
    let output = Command::new("cargo")
        .args(["run", "--quiet", "--bin", "sim", "--", "7", "3"])
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("failed to run sim binary");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("non utf8 output");
    let v: serde_json::Value = serde_json::from_str(stdout.trim()).expect("invalid json");
    assert_eq!(v["won"], true);
    assert_eq!(v["boats_remaining"], 0);
    assert_eq!(v["sunk_reports"], 2);
    let hits = v["hit_cells"].as_array().expect("hit cells array");
    assert!(hits.len() >= 3 * 2);
    assert!(hits
        .iter()
        .all(|c| matches!(c["row"].as_u64(), Some(0..=7)) && matches!(c["col"].as_u64(), Some(0..=7))));
    let replies = v["controller_replies"].as_array().expect("replies array");
    assert_eq!(replies.first().and_then(|r| r.as_str()), Some("Connected"));
    assert_eq!(replies.get(1).and_then(|r| r.as_str()), Some("ReadyForGame"));
    assert_eq!(replies.last().and_then(|r| r.as_str()), Some("Win"));
}
