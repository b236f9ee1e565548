//! Load generator for the study-buddy relay.
//!
//! usage: xtask [URL] [TOTAL] [CLIENTS]
//!
//! A request only counts when the relay answers with `"status": "success"`;
//! everything else is bucketed by what went wrong so an unreachable Ollama,
//! a rejected model and a broken relay show up separately.

use hdrhistogram::Histogram;
use rand::{seq::SliceRandom, thread_rng};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

const TECHNIQUES: [&str; 3] = ["zero-shot", "few-shot", "chain-of-thought"];
const TOPICS: [&str; 8] = [
    "gravity",
    "photosynthesis",
    "prime numbers",
    "the water cycle",
    "plate tectonics",
    "mitosis",
    "supply and demand",
    "the french revolution",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Failure {
    /// relay could not reach the inference server
    Unreachable,
    /// inference server answered with a non-200
    UpstreamStatus,
    Internal,
    BadRequest,
    /// relay itself did not answer
    Transport,
    /// relay answered something that isn't a chat reply
    Malformed,
}

#[derive(Deserialize)]
struct Reply {
    status: Option<String>,
    error: Option<String>,
}

fn classify(http_status: u16, body: &[u8]) -> Result<(), Failure> {
    let Ok(reply) = serde_json::from_slice::<Reply>(body) else {
        return Err(Failure::Malformed);
    };
    if http_status == 200 && reply.status.as_deref() == Some("success") {
        return Ok(());
    }
    if http_status == 400 {
        return Err(Failure::BadRequest);
    }
    match reply.error.as_deref() {
        Some(e) if e.starts_with("Could not connect") => Err(Failure::Unreachable),
        Some(e) if e.starts_with("Ollama returned status code") => Err(Failure::UpstreamStatus),
        Some(_) => Err(Failure::Internal),
        None => Err(Failure::Malformed),
    }
}

struct Tally {
    ok: usize,
    failures: BTreeMap<Failure, usize>,
    latency_ms: Histogram<u64>,
}

impl Tally {
    fn new() -> anyhow::Result<Self> {
        Ok(Self { ok: 0, failures: BTreeMap::new(), latency_ms: Histogram::new(3)? })
    }

    fn merge(&mut self, other: Tally) -> anyhow::Result<()> {
        self.ok += other.ok;
        for (kind, n) in other.failures {
            *self.failures.entry(kind).or_default() += n;
        }
        self.latency_ms.add(&other.latency_ms)?;
        Ok(())
    }
}

async fn one_request(client: &Client, url: &str, topic: &str, technique: &str) -> Result<(), Failure> {
    let body = serde_json::json!({"message": topic, "technique": technique});
    let res = client.post(url).json(&body).send().await.map_err(|_| Failure::Transport)?;
    let status = res.status().as_u16();
    let bytes = res.bytes().await.map_err(|_| Failure::Transport)?;
    classify(status, &bytes)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let url = args.next().unwrap_or_else(|| "http://127.0.0.1:5050/api/chat".to_string());
    let total: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(30);
    let clients: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(3).max(1);

    let client = Client::builder().pool_idle_timeout(Duration::from_secs(10)).build()?;
    let start = Instant::now();

    let mut tasks = Vec::with_capacity(clients);
    for worker in 0..clients {
        let client = client.clone();
        let url = url.clone();
        // spread the remainder over the first workers
        let share = total / clients + usize::from(worker < total % clients);
        tasks.push(tokio::spawn(async move {
            let mut per_technique = BTreeMap::new();
            for i in 0..share {
                // rotate techniques so every one gets traffic
                let technique = TECHNIQUES[(worker + i) % TECHNIQUES.len()];
                let topic = TOPICS.choose(&mut thread_rng()).copied().unwrap_or("gravity");
                let t0 = Instant::now();
                let outcome = one_request(&client, &url, topic, technique).await;
                let elapsed = t0.elapsed();

                let tally = match per_technique.entry(technique) {
                    std::collections::btree_map::Entry::Occupied(e) => e.into_mut(),
                    std::collections::btree_map::Entry::Vacant(e) => e.insert(Tally::new()?),
                };
                match outcome {
                    Ok(()) => {
                        tally.ok += 1;
                        tally.latency_ms.record(elapsed.as_millis() as u64).ok();
                    }
                    Err(kind) => *tally.failures.entry(kind).or_default() += 1,
                }
            }
            anyhow::Ok(per_technique)
        }));
    }

    let mut report: BTreeMap<&str, Tally> = BTreeMap::new();
    for t in tasks {
        for (technique, tally) in t.await?? {
            match report.get_mut(technique) {
                Some(acc) => acc.merge(tally)?,
                None => {
                    report.insert(technique, tally);
                }
            }
        }
    }

    println!("ran {} reqs against {} in {:?}", total, url, start.elapsed());
    for (technique, tally) in &report {
        let failed: usize = tally.failures.values().sum();
        println!("{technique}: {} ok, {} failed", tally.ok, failed);
        if tally.ok > 0 {
            let h = &tally.latency_ms;
            println!(
                "  latency p50 {} ms, p95 {} ms, max {} ms",
                h.value_at_quantile(0.50),
                h.value_at_quantile(0.95),
                h.max()
            );
        }
        for (kind, n) in &tally.failures {
            println!("  {kind:?}: {n}");
        }
    }
    Ok(())
}
