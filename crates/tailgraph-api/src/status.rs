// Local CLI fetch path
//
// Shells out to `tailscale status --json` and adapts the status schema into
// the same raw record shape the HTTP API produces, so one normalization
// pipeline serves both paths. The status schema names things differently
// (`HostName`, `DNSName`, `TailscaleIPs`) — only the fields with a distinct
// meaning are rewritten here; everything else passes through for the
// normalizer to snake-case.

use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::Error;
use crate::models::{RawRecord, StatusSnapshot};

/// Fetcher backed by the local `tailscale` binary.
///
/// Each host triggers two additional `tailscale ip` calls to resolve its
/// IPv4 and IPv6 addresses; these are sequential and potentially slow on
/// large tailnets.
#[derive(Debug)]
pub struct StatusCli {
    program: String,
}

impl Default for StatusCli {
    fn default() -> Self {
        Self::new("tailscale")
    }
}

impl StatusCli {
    /// Create a fetcher invoking the given binary (normally `tailscale`).
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Fetch the current status snapshot and adapt it to raw records.
    ///
    /// The local node (`Self`) is included alongside peers; self-filtering
    /// happens downstream during the merge.
    pub async fn list_devices(&self) -> Result<Vec<RawRecord>, Error> {
        let stdout = self.run(&["status", "--json"]).await?;

        let snapshot: StatusSnapshot =
            serde_json::from_str(&stdout).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: stdout,
            })?;

        let mut records = Vec::new();
        if let Some(self_node) = snapshot.self_node {
            records.push(self.adapt(self_node).await);
        }
        for (key, peer) in snapshot.peers {
            match peer {
                Value::Object(rec) => records.push(self.adapt(rec).await),
                other => {
                    warn!(%key, ?other, "skipping non-object peer entry");
                }
            }
        }

        debug!(count = records.len(), "fetched status records");
        Ok(records)
    }

    /// Rewrite a status-schema record into the API record shape, then fill
    /// in addresses via the CLI.
    ///
    /// Status snapshots can omit addresses for idle peers; both families are
    /// resolved for every host with a hostname. A resolution failure only
    /// loses addresses for that host, never the record.
    async fn adapt(&self, rec: RawRecord) -> RawRecord {
        let (mut rec, mut addresses) = rewrite_status_record(rec);

        if let Some(hostname) = rec.get("hostname").and_then(Value::as_str) {
            let hostname = hostname.to_owned();
            for family in ["-4", "-6"] {
                match self.run(&["ip", family, &hostname]).await {
                    Ok(out) => {
                        for line in out.lines().map(str::trim).filter(|l| !l.is_empty()) {
                            push_unique_address(&mut addresses, line);
                        }
                    }
                    Err(err) => {
                        warn!(%hostname, family, %err, "address resolution failed");
                    }
                }
            }
        }

        rec.insert("addresses".into(), Value::Array(addresses));
        rec
    }

    /// Run the binary with the given arguments, returning stdout.
    async fn run(&self, args: &[&str]) -> Result<String, Error> {
        debug!(program = %self.program, ?args, "running tailscale CLI");

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|source| Error::CommandSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                program: self.program.clone(),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Rewrite a status-schema record into the API record shape.
///
/// `HostName` → `hostname`, `DNSName` → `name`, `ID` → `id`; `TailscaleIPs`
/// is lifted out and returned as the initial address list. Remaining
/// PascalCase keys (`OS`, `Tags`, `LastSeen`, ...) are left for the generic
/// key normalizer.
fn rewrite_status_record(mut rec: RawRecord) -> (RawRecord, Vec<Value>) {
    if let Some(v) = rec.remove("HostName") {
        rec.insert("hostname".into(), v);
    }
    if let Some(v) = rec.remove("DNSName") {
        rec.insert("name".into(), v);
    }
    if let Some(v) = rec.remove("ID") {
        rec.insert("id".into(), v);
    }
    let addresses = match rec.remove("TailscaleIPs") {
        Some(Value::Array(ips)) => ips,
        _ => Vec::new(),
    };
    (rec, addresses)
}

/// Append an address line unless it is already present.
fn push_unique_address(addresses: &mut Vec<Value>, line: &str) {
    if !addresses.iter().any(|a| a.as_str() == Some(line)) {
        addresses.push(Value::String(line.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn rec(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn rewrite_maps_status_keys_to_the_api_shape() {
        let raw = rec(json!({
            "HostName": "alpha",
            "DNSName": "alpha.example.com.",
            "ID": "12",
            "TailscaleIPs": ["100.92.75.96", "fd7a:115c:a1e0::1"],
            "OS": "linux",
            "LastSeen": "2022-07-18T19:58:00Z"
        }));

        let (out, addresses) = rewrite_status_record(raw);

        assert_eq!(out.get("hostname"), Some(&json!("alpha")));
        assert_eq!(out.get("name"), Some(&json!("alpha.example.com.")));
        assert_eq!(out.get("id"), Some(&json!("12")));
        assert!(!out.contains_key("HostName"));
        assert!(!out.contains_key("DNSName"));
        assert!(!out.contains_key("ID"));
        assert!(!out.contains_key("TailscaleIPs"));
        // Untouched keys wait for the generic normalizer.
        assert_eq!(out.get("OS"), Some(&json!("linux")));
        assert_eq!(out.get("LastSeen"), Some(&json!("2022-07-18T19:58:00Z")));
        assert_eq!(addresses, vec![json!("100.92.75.96"), json!("fd7a:115c:a1e0::1")]);
    }

    #[test]
    fn rewrite_tolerates_missing_and_malformed_fields() {
        let (out, addresses) = rewrite_status_record(rec(json!({ "OS": "linux" })));
        assert!(!out.contains_key("hostname"));
        assert!(addresses.is_empty());

        let (_, addresses) = rewrite_status_record(rec(json!({ "TailscaleIPs": "not-a-list" })));
        assert!(addresses.is_empty());
    }

    #[test]
    fn resolved_addresses_are_deduplicated() {
        let mut addresses = vec![json!("100.92.75.96")];
        push_unique_address(&mut addresses, "100.92.75.96");
        push_unique_address(&mut addresses, "fd7a:115c:a1e0::1");
        push_unique_address(&mut addresses, "fd7a:115c:a1e0::1");
        assert_eq!(
            addresses,
            vec![json!("100.92.75.96"), json!("fd7a:115c:a1e0::1")]
        );
    }

    /// Stub `tailscale` that serves a fixed snapshot and one IPv4 per host.
    #[cfg(unix)]
    fn stub_cli(dir: &std::path::Path) -> StatusCli {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("tailscale-stub");
        std::fs::write(
            &script,
            r#"#!/bin/sh
if [ "$1" = "status" ]; then
  cat <<'EOF'
{
  "Self": { "HostName": "local", "DNSName": "local.example.com.", "ID": "1" },
  "Peer": {
    "nodekey:aa": {
      "HostName": "alpha",
      "DNSName": "alpha.example.com.",
      "ID": "2",
      "TailscaleIPs": ["100.92.75.96"]
    },
    "nodekey:bb": "garbage"
  }
}
EOF
elif [ "$2" = "-4" ]; then
  echo 100.92.75.96
fi
"#,
        )
        .expect("write stub");
        let mut perms = std::fs::metadata(&script).expect("stat stub").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script, perms).expect("chmod stub");
        StatusCli::new(script.to_string_lossy().into_owned())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn snapshot_yields_self_and_object_peers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cli = stub_cli(dir.path());

        let records = cli.list_devices().await.expect("stub fetch succeeds");

        // Self plus one object peer; the garbage peer entry is skipped.
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("hostname"), Some(&json!("local")));
        assert_eq!(records[1].get("hostname"), Some(&json!("alpha")));
        // Snapshot address and the resolved one collapse to a single entry.
        assert_eq!(records[1].get("addresses"), Some(&json!(["100.92.75.96"])));
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let cli = StatusCli::new("/nonexistent/tailgraph-test-binary");
        let err = cli.list_devices().await.expect_err("spawn must fail");
        assert!(err.is_cli_unavailable(), "expected spawn failure, got: {err}");
    }

    #[tokio::test]
    async fn nonzero_exit_carries_the_status() {
        let cli = StatusCli::new("false");
        match cli.list_devices().await {
            Err(Error::CommandFailed { program, status, .. }) => {
                assert_eq!(program, "false");
                assert_ne!(status, 0);
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }
}
