use courtcore::live_stats::{JobStatus, RawLiveStats};
use courtcore::metrics::PollMetrics;
use courtcore::normalize;
use courtcore::poll::{PollError, PollSession, SequenceCounter};
use courtcore::store::TelemetryStore;
use iced::{
    time,
    widget::{
        button, canvas::Canvas, column, image, row, scrollable, text, text_input, Column,
        Container,
    },
    Alignment, Element, Length, Subscription, Task, Theme,
};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

mod court;
mod panels;
mod stream;

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

fn main() -> iced::Result {
    env_logger::init();
    iced::application(Dashboard::boot, Dashboard::update, Dashboard::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Dashboard) -> String {
    "PickleVision Live Dashboard".into()
}

fn application_subscription(_: &Dashboard) -> Subscription<Message> {
    time::every(POLL_INTERVAL).map(|_| Message::Tick)
}

fn application_theme(_: &Dashboard) -> Theme {
    Theme::Dark
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatmapKind {
    Player,
    Ball,
}

impl HeatmapKind {
    fn path_segment(self) -> &'static str {
        match self {
            HeatmapKind::Player => "player",
            HeatmapKind::Ball => "ball",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Tick,
    BaseUrlChanged(String),
    JobIdChanged(String),
    WatchJob,
    ClearJob,
    TogglePlayback,
    StatsFetched(u64, Result<RawLiveStats, PollError>),
    FrameFetched(u64, Result<Vec<u8>, String>),
    HeatmapFetched(HeatmapKind, u64, Result<Vec<u8>, String>),
}

/// Latest image for one surface, guarded by the same sequence numbers as
/// the stats path: a completion from before the current barrier (a job
/// switch) or older than the installed image is discarded.
#[derive(Default)]
struct ImageSlot {
    handle: Option<image::Handle>,
    last_seq: u64,
}

impl ImageSlot {
    /// Drops the image and raises the staleness barrier, so completions of
    /// requests issued at or below `barrier` no longer install.
    fn clear(&mut self, barrier: u64) {
        self.handle = None;
        self.last_seq = barrier;
    }

    /// Installs the image unless `seq` is not newer than the last installed
    /// sequence number. Returns whether the image was taken.
    fn install(&mut self, seq: u64, bytes: Vec<u8>) -> bool {
        if seq <= self.last_seq {
            return false;
        }
        self.last_seq = seq;
        self.handle = Some(image::Handle::from_bytes(bytes));
        true
    }
}

struct Dashboard {
    base_url: String,
    job_input: String,
    session: Option<PollSession>,
    sequences: SequenceCounter,
    store: TelemetryStore,
    metrics: PollMetrics,
    playing: bool,
    frame: ImageSlot,
    player_heat: ImageSlot,
    ball_heat: ImageSlot,
    last_status: JobStatus,
    status_line: String,
    history: Vec<String>,
}

impl Dashboard {
    fn boot() -> (Self, Task<Message>) {
        (
            Dashboard {
                base_url: DEFAULT_BASE_URL.into(),
                job_input: String::new(),
                session: None,
                sequences: SequenceCounter::new(),
                store: TelemetryStore::new(),
                metrics: PollMetrics::new(),
                playing: true,
                frame: ImageSlot::default(),
                player_heat: ImageSlot::default(),
                ball_heat: ImageSlot::default(),
                last_status: JobStatus::Processing,
                status_line: "No job attached".into(),
                history: Vec::new(),
            },
            Task::none(),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => state.poll(),
            Message::BaseUrlChanged(value) => {
                state.base_url = value;
                Task::none()
            }
            Message::JobIdChanged(value) => {
                state.job_input = value;
                Task::none()
            }
            Message::WatchJob => {
                let job_id = state.job_input.trim().to_string();
                if job_id.is_empty() {
                    state.status_line = "Enter a job id to watch".into();
                    return Task::none();
                }
                // raise the staleness barriers before the new session so any
                // in-flight response from the old job is discarded
                let barrier = state.sequences.last_issued();
                state.store.reset(barrier);
                state.frame.clear(barrier);
                state.player_heat.clear(barrier);
                state.ball_heat.clear(barrier);
                state.session = Some(PollSession::new(job_id.clone()));
                state.playing = true;
                state.last_status = JobStatus::Processing;
                state.status_line = format!("Watching job {job_id}");
                state.push_history(format!("Watching job {job_id}"));
                state.poll()
            }
            Message::ClearJob => {
                let barrier = state.sequences.last_issued();
                state.store.reset(barrier);
                state.frame.clear(barrier);
                state.player_heat.clear(barrier);
                state.ball_heat.clear(barrier);
                state.session = None;
                state.status_line = "No job attached".into();
                state.push_history("Job cleared".into());
                Task::none()
            }
            Message::TogglePlayback => {
                state.playing = !state.playing;
                Task::none()
            }
            Message::StatsFetched(seq, result) => {
                if let Some(session) = state.session.as_mut() {
                    session.complete(seq);
                }
                match result {
                    Ok(raw) => {
                        let model = normalize(Some(&raw));
                        let status = model.status;
                        let progress = model.progress;
                        if state.store.apply(seq, model) {
                            state.metrics.record_applied();
                            state.status_line = format!(
                                "{} {:.1}%",
                                status.label().to_uppercase(),
                                progress * 100.0
                            );
                            if status != state.last_status {
                                state.push_history(format!("Status changed to {status}"));
                                state.last_status = status;
                            }
                        } else {
                            state.metrics.record_stale();
                            state.push_history(format!("Discarded stale snapshot {seq}"));
                        }
                    }
                    Err(err) => {
                        // a single missed tick is never surfaced; the
                        // previous snapshot stays current
                        state.metrics.record_fetch_error();
                        log::debug!("live-stats tick dropped: {err}");
                    }
                }
                Task::none()
            }
            Message::FrameFetched(seq, result) => {
                match result {
                    Ok(bytes) => {
                        if !state.frame.install(seq, bytes) {
                            log::debug!("stale frame from request {seq} discarded");
                        }
                    }
                    Err(err) => log::debug!("frame fetch dropped: {err}"),
                }
                Task::none()
            }
            Message::HeatmapFetched(kind, seq, result) => {
                match result {
                    Ok(bytes) => {
                        let slot = match kind {
                            HeatmapKind::Player => &mut state.player_heat,
                            HeatmapKind::Ball => &mut state.ball_heat,
                        };
                        if !slot.install(seq, bytes) {
                            log::debug!("stale heatmap from request {seq} discarded");
                        }
                    }
                    Err(err) => log::debug!("heatmap fetch dropped: {err}"),
                }
                Task::none()
            }
        }
    }

    /// One poll tick: claims a sequence number and fans out the fetches.
    /// Produces nothing while no job is attached or a stats request is
    /// still in flight.
    fn poll(&mut self) -> Task<Message> {
        let Some(session) = self.session.as_mut() else {
            return Task::none();
        };
        let Some(seq) = session.begin_tick(&mut self.sequences) else {
            return Task::none();
        };
        self.metrics.record_tick();
        let base = self.base_url.trim_end_matches('/').to_string();
        let job_id = session.job_id().to_string();

        let mut tasks = vec![Task::perform(
            fetch_live_stats(base.clone(), job_id.clone()),
            move |result| Message::StatsFetched(seq, result),
        )];
        if self.playing {
            tasks.push(Task::perform(
                fetch_frame(base.clone(), job_id.clone()),
                move |result| Message::FrameFetched(seq, result),
            ));
            for kind in [HeatmapKind::Player, HeatmapKind::Ball] {
                tasks.push(Task::perform(
                    fetch_heatmap(base.clone(), job_id.clone(), kind),
                    move |result| Message::HeatmapFetched(kind, seq, result),
                ));
            }
        }
        Task::batch(tasks)
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let model = state.store.latest();

        let job_column = column![
            text("PickleVision").size(26),
            text("Smart match analytics").size(12),
            text_input("Backend URL", &state.base_url)
                .on_input(Message::BaseUrlChanged)
                .padding(6),
            text_input("Job id", &state.job_input)
                .on_input(Message::JobIdChanged)
                .padding(6),
            row![
                button("Watch").on_press(Message::WatchJob).padding(8),
                button("Clear").on_press(Message::ClearJob).padding(8),
            ]
            .spacing(8),
            text(&state.status_line).size(14),
        ]
        .spacing(8);

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let sidebar = column![
            job_column,
            panels::stat_tiles(&model),
            panels::zone_table(&model),
            panels::spatial_readout(&model),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(110.0))).padding(6),
        ]
        .spacing(12)
        .padding(16)
        .width(Length::Fixed(320.0));

        let center = column![
            stream::surface(state.playing, state.frame.handle.as_ref(), &model),
            stream::timeline(&model),
            stream::controls(state.playing, &model),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let court_canvas = Canvas::new(court::CourtMap::new(&model))
            .width(Length::Fill)
            .height(Length::Fixed(420.0));

        let right = column![
            text("Live Court").size(16),
            court_canvas,
            text("Player Heat").size(16),
            heatmap_panel(state.player_heat.handle.as_ref()),
            text("Ball Heat").size(16),
            heatmap_panel(state.ball_heat.handle.as_ref()),
        ]
        .spacing(8)
        .padding(16)
        .width(Length::Fixed(300.0));

        let snapshot = state.metrics.snapshot();
        let footer = row![
            text(format!(
                "ticks {} / applied {} / stale {} / errors {}",
                snapshot.ticks, snapshot.applied, snapshot.stale_dropped, snapshot.fetch_errors
            ))
            .size(10),
            text("PickleVision v0.8.0").size(10),
        ]
        .spacing(20)
        .padding(8);

        let layout = row![sidebar, center, right]
            .spacing(10)
            .align_y(Alignment::Start);

        Container::new(column![layout, footer])
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

fn heatmap_panel<'a>(handle: Option<&image::Handle>) -> Element<'a, Message> {
    match handle {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(150.0))
            .into(),
        None => Container::new(text("No heatmap yet").size(12))
            .width(Length::Fill)
            .height(Length::Fixed(150.0))
            .padding(6)
            .into(),
    }
}

fn cache_bust() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0)
}

async fn fetch_live_stats(base: String, job_id: String) -> Result<RawLiveStats, PollError> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| PollError::Transport(e.to_string()))?;
    let response = client
        .get(format!("{base}/api/live_stats/{job_id}"))
        .send()
        .await
        .map_err(|e| PollError::Transport(e.to_string()))?;
    if !response.status().is_success() {
        return Err(PollError::Status(response.status().as_u16()));
    }
    let body = response
        .text()
        .await
        .map_err(|e| PollError::Transport(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| PollError::Decode(e.to_string()))
}

async fn fetch_frame(base: String, job_id: String) -> Result<Vec<u8>, String> {
    fetch_image(format!("{base}/api/stream/{job_id}?t={}", cache_bust())).await
}

async fn fetch_heatmap(base: String, job_id: String, kind: HeatmapKind) -> Result<Vec<u8>, String> {
    fetch_image(format!(
        "{base}/api/live_heatmap/{}/{job_id}?t={}",
        kind.path_segment(),
        cache_bust()
    ))
    .await
}

async fn fetch_image(url: String) -> Result<Vec<u8>, String> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| e.to_string())?;
    let response = client.get(url).send().await.map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }
    let bytes = response.bytes().await.map_err(|e| e.to_string())?;
    Ok(bytes.to_vec())
}
