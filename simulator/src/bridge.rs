use crate::generator::match_sim::MatchSim;
use crate::scenario::config::ScenarioConfig;
use courtcore::live_stats::RawLiveStats;
use rand::Rng;
use serde_json::json;
use std::{
    collections::HashMap,
    fs,
    net::SocketAddr,
    path::Path,
    sync::{Arc, RwLock},
    thread,
    time::Duration,
};
use tokio::runtime::Builder;
use warp::{
    http::{Response, StatusCode},
    hyper::body::Bytes,
    Filter,
};

/// Latest emitted snapshot for one synthetic job.
#[derive(Debug, Clone)]
pub struct JobState {
    pub latest: RawLiveStats,
    pub done: bool,
}

impl JobState {
    fn pending() -> Self {
        Self {
            latest: RawLiveStats {
                progress: Some(0.0),
                status: Some("processing".to_string()),
                stats: None,
            },
            done: false,
        }
    }
}

type Jobs = Arc<RwLock<HashMap<String, Arc<RwLock<JobState>>>>>;

/// Hosts the backend HTTP surface consumed by the dashboard: upload,
/// live stats, frame stream, and heatmaps. Each uploaded job is driven by
/// its own stepping thread until the scenario runs out of frames.
pub struct BackendBridge {
    jobs: Jobs,
}

impl BackendBridge {
    pub fn new(config: Arc<ScenarioConfig>, port: u16) -> Self {
        let jobs: Jobs = Arc::new(RwLock::new(HashMap::new()));
        let jobs_for_server = jobs.clone();

        thread::spawn(move || {
            let routes = build_routes(jobs_for_server, config);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes)
                    .run(SocketAddr::from(([127, 0, 0, 1], port)))
                    .await;
            });
        });

        Self { jobs }
    }

    pub fn job_count(&self) -> usize {
        self.jobs.read().map(|jobs| jobs.len()).unwrap_or(0)
    }
}

/// Registers a new job and starts its stepping thread.
pub fn register_job(jobs: &Jobs, config: &ScenarioConfig) -> String {
    let job_id = format!("{:08x}", rand::thread_rng().gen::<u32>());
    let state = Arc::new(RwLock::new(JobState::pending()));
    if let Ok(mut map) = jobs.write() {
        map.insert(job_id.clone(), state.clone());
    }

    let sim_config = config.clone();
    let step_delay = Duration::from_millis(config.step_ms.max(1));
    thread::spawn(move || {
        let mut sim = MatchSim::new(&sim_config);
        loop {
            let snapshot = sim.step();
            let finished = sim.finished();
            if let Ok(mut guard) = state.write() {
                guard.latest = snapshot;
                guard.done = finished;
            }
            if finished {
                break;
            }
            thread::sleep(step_delay);
        }
        log::info!("synthetic job finished");
    });

    job_id
}

fn serve_asset(dir: Option<&Path>, file_name: &str, content_type: &str) -> Response<Vec<u8>> {
    let bytes = dir
        .map(|d| d.join(file_name))
        .and_then(|path| fs::read(path).ok());
    let response = match bytes {
        Some(bytes) => Response::builder()
            .header("content-type", content_type)
            .body(bytes),
        None => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(b"asset not available".to_vec()),
    };
    response.unwrap_or_else(|_| Response::new(Vec::new()))
}

pub fn build_routes(
    jobs: Jobs,
    config: Arc<ScenarioConfig>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let jobs_for_filter = jobs;
    let jobs_filter = warp::any().map(move || jobs_for_filter.clone());
    let config_for_filter = config;
    let config_filter = warp::any().map(move || config_for_filter.clone());

    // The upload body (a multipart-encoded video in the real backend) is
    // accepted opaquely; only the job registration matters here.
    let upload = warp::path!("api" / "upload")
        .and(warp::post())
        .and(warp::body::bytes())
        .and(jobs_filter.clone())
        .and(config_filter.clone())
        .map(
            |_body: Bytes, jobs: Jobs, config: Arc<ScenarioConfig>| {
                let job_id = register_job(&jobs, &config);
                log::info!("registered synthetic job {}", job_id);
                warp::reply::with_status(
                    warp::reply::json(&json!({
                        "job_id": job_id,
                        "message": "Video uploaded and processing started."
                    })),
                    StatusCode::OK,
                )
            },
        );

    let live_stats = warp::path!("api" / "live_stats" / String)
        .and(warp::get())
        .and(jobs_filter)
        .map(|job_id: String, jobs: Jobs| {
            let state = jobs
                .read()
                .ok()
                .and_then(|map| map.get(&job_id).cloned())
                .and_then(|state| state.read().map(|guard| guard.latest.clone()).ok());
            match state {
                Some(latest) => {
                    warp::reply::with_status(warp::reply::json(&latest), StatusCode::OK)
                }
                None => warp::reply::with_status(
                    warp::reply::json(&json!({"detail": "Job not found"})),
                    StatusCode::NOT_FOUND,
                ),
            }
        });

    let stream = warp::path!("api" / "stream" / String)
        .and(warp::get())
        .and(config_filter.clone())
        .map(|_job_id: String, config: Arc<ScenarioConfig>| {
            serve_asset(config.assets_dir.as_deref(), "frame.jpg", "image/jpeg")
        });

    let heatmap = warp::path!("api" / "live_heatmap" / String / String)
        .and(warp::get())
        .and(config_filter)
        .map(
            |kind: String, _job_id: String, config: Arc<ScenarioConfig>| match kind.as_str() {
                "player" | "ball" => serve_asset(
                    config.assets_dir.as_deref(),
                    &format!("{kind}_heatmap.png"),
                    "image/png",
                ),
                _ => serve_asset(None, "", "image/png"),
            },
        );

    upload.or(live_stats).or(stream).or(heatmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_jobs() -> Jobs {
        Arc::new(RwLock::new(HashMap::new()))
    }

    fn quick_config() -> Arc<ScenarioConfig> {
        Arc::new(ScenarioConfig {
            total_frames: 5,
            step_ms: 1,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn upload_registers_a_pollable_job() {
        let jobs = test_jobs();
        let routes = build_routes(jobs.clone(), quick_config());

        let response = warp::test::request()
            .method("POST")
            .path("/api/upload")
            .body("fake video bytes")
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        let job_id = body["job_id"].as_str().unwrap().to_string();
        assert_eq!(jobs.read().unwrap().len(), 1);

        let response = warp::test::request()
            .method("GET")
            .path(&format!("/api/live_stats/{job_id}"))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let latest: RawLiveStats = serde_json::from_slice(response.body()).unwrap();
        let status = latest.status.as_deref().unwrap();
        assert!(status == "processing" || status == "completed");
    }

    #[tokio::test]
    async fn unknown_job_is_not_found() {
        let routes = build_routes(test_jobs(), quick_config());
        let response = warp::test::request()
            .method("GET")
            .path("/api/live_stats/no-such-job")
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn stream_without_assets_is_not_found() {
        let routes = build_routes(test_jobs(), quick_config());
        let response = warp::test::request()
            .method("GET")
            .path("/api/stream/abc?t=123")
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn register_job_reaches_completion() {
        let jobs = test_jobs();
        let config = quick_config();
        let job_id = register_job(&jobs, &config);
        let state = jobs.read().unwrap().get(&job_id).cloned().unwrap();

        for _ in 0..200 {
            if state.read().unwrap().done {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        let guard = state.read().unwrap();
        assert!(guard.done);
        assert_eq!(guard.latest.progress, Some(1.0));
    }
}
