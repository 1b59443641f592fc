//! `harrec convert <LOG>...` – replay event logs and write one HAR file.

use anyhow::Result;
use harrec_core::config::HarrecConfig;
use harrec_core::eventlog::{self, ReplayStats};
use harrec_core::export::{self, DirectorySink};
use harrec_core::har::Synthesizer;
use harrec_core::model::Session;
use std::path::PathBuf;

#[derive(Debug)]
pub struct ConvertArgs {
    pub logs: Vec<PathBuf>,
    /// Page URL for the first session; its first request's URL otherwise.
    pub page_url: Option<String>,
    pub out_dir: PathBuf,
    pub pretty: bool,
}

/// Replays each log into its own session on the blocking pool.
/// Results come back in the order of `logs`.
pub(super) async fn replay_logs(logs: &[PathBuf]) -> Result<Vec<(Session, ReplayStats)>> {
    let mut join_set = tokio::task::JoinSet::new();
    for (index, path) in logs.iter().cloned().enumerate() {
        join_set.spawn_blocking(move || -> Result<(usize, Session, ReplayStats)> {
            let mut session = Session::default();
            let stats = eventlog::replay_path(&path, &mut session)?;
            tracing::info!(
                events = stats.events,
                ignored = stats.ignored,
                entries = session.entries.len(),
                "replayed {}",
                path.display()
            );
            Ok((index, session, stats))
        });
    }

    let mut replayed: Vec<Option<(Session, ReplayStats)>> = logs.iter().map(|_| None).collect();
    while let Some(res) = join_set.join_next().await {
        let (index, session, stats) =
            res.map_err(|e| anyhow::anyhow!("replay task join: {}", e))??;
        replayed[index] = Some((session, stats));
    }
    Ok(replayed.into_iter().flatten().collect())
}

pub async fn run_convert(cfg: &HarrecConfig, args: ConvertArgs) -> Result<PathBuf> {
    let mut sessions: Vec<Session> = replay_logs(&args.logs)
        .await?
        .into_iter()
        .map(|(session, _)| session)
        .collect();
    if let (Some(url), Some(first)) = (args.page_url, sessions.first_mut()) {
        first.url = Some(url);
    }

    let archive = Synthesizer::new(cfg.synth_options()).build(&sessions);
    let page_url = sessions.first().and_then(Session::page_url);
    let mut sink = DirectorySink::new(&args.out_dir);
    let file_name = export::export_archive(&mut sink, &archive, page_url, args.pretty)?;
    let path = args.out_dir.join(file_name);
    println!(
        "Wrote {} ({} page(s), {} entries)",
        path.display(),
        archive.log.pages.len(),
        archive.log.entries.len()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const DOC: &str = concat!(
        r#"{"method":"Network.requestWillBeSent","params":{"requestId":"1","timestamp":10.0,"wallTime":1700000000.0,"initiator":{"type":"other"},"request":{"url":"https://shop.example/","method":"GET","headers":{}}}}"#,
        "\n",
        r#"{"method":"Network.responseReceived","params":{"requestId":"1","response":{"url":"https://shop.example/","status":200,"statusText":"OK","headers":{},"mimeType":"text/html","protocol":"h2","timing":{"requestTime":10.0,"dnsStart":-1,"dnsEnd":-1,"connectStart":-1,"connectEnd":-1,"sslStart":-1,"sslEnd":-1,"sendStart":0.1,"sendEnd":0.2,"receiveHeadersEnd":5.0}}}}"#,
        "\n",
        r#"{"method":"Network.loadingFinished","params":{"requestId":"1","timestamp":10.1,"encodedDataLength":300}}"#,
        "\n",
    );

    const EMPTY: &str = "\n";

    #[tokio::test]
    async fn replay_keeps_log_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.jsonl");
        let b = dir.path().join("b.jsonl");
        fs::write(&a, DOC).unwrap();
        fs::write(&b, EMPTY).unwrap();

        let replayed = replay_logs(&[b.clone(), a.clone()]).await.unwrap();
        assert_eq!(replayed.len(), 2);
        assert_eq!(replayed[0].1.events, 0);
        assert_eq!(replayed[1].1.events, 3);
        assert_eq!(replayed[1].0.page_url(), Some("https://shop.example/"));
    }

    #[tokio::test]
    async fn convert_writes_one_archive_per_run() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("shop.jsonl");
        fs::write(&log, DOC).unwrap();
        let out_dir = dir.path().join("out");

        let path = run_convert(
            &HarrecConfig::default(),
            ConvertArgs {
                logs: vec![log.clone(), log],
                page_url: None,
                out_dir: out_dir.clone(),
                pretty: false,
            },
        )
        .await
        .unwrap();
        assert_eq!(path, out_dir.join("shop.example.har"));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(r#"{"log":{"version":"1.2""#));
        assert_eq!(written.matches(r#""pageref":"page_1_"#).count(), 1);
        assert_eq!(written.matches(r#""pageref":"page_2_"#).count(), 1);
    }

    #[tokio::test]
    async fn url_override_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("shop.jsonl");
        fs::write(&log, DOC).unwrap();

        let path = run_convert(
            &HarrecConfig::default(),
            ConvertArgs {
                logs: vec![log],
                page_url: Some("http://localhost:3000/checkout".into()),
                out_dir: dir.path().to_path_buf(),
                pretty: true,
            },
        )
        .await
        .unwrap();
        assert_eq!(path, dir.path().join("localhost:3000.har"));
    }

    #[tokio::test]
    async fn missing_log_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = replay_logs(&[dir.path().join("absent.jsonl")])
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("absent.jsonl"));
    }
}
