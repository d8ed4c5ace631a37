//! Binaries that fail before a run still print an ExecResult and exit 1

#[cfg(test)]
mod startup_failure_tests {
    use serde_json::Value;
    use std::process::Command;

    fn command(bin: &str) -> Command {
        let mut cmd = Command::new(bin);
        // Keep a developer's .env out of the picture
        cmd.current_dir(std::env::temp_dir())
            .env_remove("RPC_URL")
            .env_remove("ORACLE_ADDRESS")
            .env_remove("CHAIN_ID")
            .env_remove("MASHUP_ARGS")
            .env_remove("FLOOR_ARGS")
            .env("RUST_LOG", "off");
        cmd
    }

    fn skipped(mut cmd: Command) -> Value {
        let output = cmd.output().unwrap();
        assert_eq!(output.status.code(), Some(1));

        let result: Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(result["canExec"], Value::Bool(false));
        assert!(result.get("callData").is_none());
        result
    }

    #[test]
    fn test_floor_watch_without_rpc_url() {
        let result = skipped(command(env!("CARGO_BIN_EXE_floor_watch")));
        assert_eq!(result["message"], "Missing environment variable: RPC_URL");
    }

    #[test]
    fn test_mashup_with_unparseable_args() {
        let mut cmd = command(env!("CARGO_BIN_EXE_mashup"));
        cmd.env("RPC_URL", "http://127.0.0.1:8545")
            .env("MASHUP_ARGS", "not json");

        let result = skipped(cmd);
        assert!(result["message"].as_str().is_some_and(|m| !m.is_empty()));
    }
}
