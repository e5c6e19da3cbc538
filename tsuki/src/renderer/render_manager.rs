use std::{
    collections::VecDeque,
    sync::{
        atomic::AtomicBool,
        mpsc::{channel, Receiver, RecvError, SendError, Sender, TryRecvError},
        Arc, Mutex, PoisonError,
    },
    thread::JoinHandle,
    time::{Duration, Instant},
};

use super::{render_worker, render_worker::WorkerInfo, RenderSettings};

use crate::{
    camera::Camera,
    film::{film_tiles, Film, FilmSettings},
    integrators::{Integrator, Whitted, WhittedParams},
    sampling::{Sampler, StratifiedSampler},
    scene::Scene,
    tsuki_debug, tsuki_error, tsuki_info, tsuki_trace,
};

// Keeps the manager from spinning while workers are busy
const POLL_INTERVAL: Duration = Duration::from_millis(1);

struct TileInfo {
    elapsed_s: f32,
    rays: usize,
}

pub enum Message {
    Progress {
        render_id: usize,
        active_threads: usize,
        tiles_done: usize,
        tiles_total: usize,
        approx_remaining_s: f32,
        current_rays_per_s: f32,
    },
    Finished {
        render_id: usize,
        ray_count: usize,
        secs: f32,
        cancelled: bool,
    },
}

pub struct RenderManager {
    pub tx: Sender<Option<Payload>>,
    pub rx: Receiver<Message>,
    pub handle: JoinHandle<()>,
}

pub struct Payload {
    pub render_id: usize,
    pub scene: Arc<Scene>,
    pub film: Arc<Mutex<Film>>,
    pub film_settings: FilmSettings,
    pub render_settings: RenderSettings,
    pub cancel: Arc<AtomicBool>,
}

#[derive(Default)]
struct ManagerState {
    active_tiles_total: usize,
    active_tiles_done: usize,
    active_render_id: usize,
    active_workers: usize,
    ray_count: usize,
    tile_infos: VecDeque<TileInfo>,
    cancel: Option<Arc<AtomicBool>>,
    start: Option<Instant>,
}

type Worker = (Sender<Option<render_worker::Payload>>, JoinHandle<()>);

pub fn launch(
    to_parent: Sender<Message>,
    from_parent: Receiver<Option<Payload>>,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("RenderManager".into())
        .spawn(move || {
            let (worker_send, from_workers) = channel();
            let mut workers: Vec<Worker> = Vec::new();

            'thread: loop {
                let mut state = ManagerState::default();

                // Blocking recv to avoid spinlock when there is no need to message the parent
                let mut previous_message = match from_parent.recv() {
                    Ok(msg) => Some(Ok(msg)),
                    Err(RecvError {}) => {
                        tsuki_debug!("Render manager: Receive channel disconnected");
                        break 'thread;
                    }
                };
                'work: loop {
                    let message = previous_message
                        .take()
                        .unwrap_or_else(|| from_parent.try_recv());
                    let payload = match message {
                        Ok(Some(payload)) => {
                            tsuki_debug!("Render manager: Received new payload");
                            Some(payload)
                        }
                        Ok(None) => {
                            tsuki_debug!("Render manager: Killed by parent");
                            break 'thread;
                        }
                        Err(TryRecvError::Disconnected) => {
                            tsuki_debug!("Render manager: Receive channel disconnected");
                            break 'thread;
                        }
                        Err(TryRecvError::Empty) => None,
                    };

                    if let Some(payload) = payload {
                        let thread_count = payload
                            .render_settings
                            .thread_count
                            .unwrap_or_else(num_cpus::get)
                            .max(1);
                        if let Err(why) =
                            spawn_workers(thread_count, &worker_send, &mut workers)
                        {
                            tsuki_error!("Render manager: Failed to spawn workers: {}", why);
                            if workers.is_empty() {
                                break 'thread;
                            }
                        }

                        propagate_payload(payload, thread_count, &workers, &mut state);
                        if state.active_workers == 0 {
                            report_finished(&to_parent, &state);
                            break 'work;
                        }
                    } else {
                        let active_workers = state.active_workers;

                        handle_worker_messages(&from_workers, &to_parent, &mut state);

                        let task_finished = active_workers > 0 && state.active_workers == 0;
                        if task_finished {
                            report_finished(&to_parent, &state);
                            break 'work;
                        }

                        std::thread::sleep(POLL_INTERVAL);
                    }
                }
            }

            // Kill everyone first so that workers shut down in parallel
            for (tx, _) in &workers {
                // No need to check for error, worker having disconnected, since that's our goal
                drop(tx.send(None));
            }
            for (_, handle) in workers {
                if handle.join().is_err() {
                    tsuki_error!("Render manager: A worker panicked");
                }
            }

            tsuki_debug!("Render manager: End");
        })
}

// Grows the pool to at least `thread_count` workers
fn spawn_workers(
    thread_count: usize,
    worker_send: &Sender<render_worker::Message>,
    workers: &mut Vec<Worker>,
) -> std::io::Result<()> {
    while workers.len() < thread_count {
        let thread_id = workers.len();
        let (to_worker, worker_receive) = channel();
        let worker_send = worker_send.clone();
        let handle = std::thread::Builder::new()
            .name(format!("RenderWorker{}", thread_id))
            .spawn(move || {
                render_worker::launch(thread_id, &worker_send, &worker_receive);
            })?;
        workers.push((to_worker, handle));
        tsuki_trace!("Render manager: Spawned worker {}", thread_id);
    }
    Ok(())
}

fn propagate_payload(
    payload: Payload,
    thread_count: usize,
    workers: &[Worker],
    state: &mut ManagerState,
) {
    let start = Instant::now();

    let tiles = Arc::new(Mutex::new(film_tiles(&payload.film, &payload.film_settings)));
    let tile_count = tiles.lock().unwrap_or_else(PoisonError::into_inner).len();

    let camera = Camera::new(payload.scene.camera(), payload.film_settings.res);
    let integrator: Arc<dyn Integrator> = Arc::new(Whitted::new(WhittedParams {
        max_depth: payload.render_settings.max_depth,
        use_environment_map: payload.render_settings.use_environment_map,
    }));
    let sampler: Arc<dyn Sampler> = Arc::new(StratifiedSampler::new(
        payload.render_settings.aa_grid,
        payload.render_settings.jitter_samples,
        payload.render_settings.seed,
    ));

    let mut active_workers = 0;
    for (tx, _) in workers.iter().take(thread_count) {
        let thread_payload = render_worker::Payload {
            render_id: payload.render_id,
            tiles: Arc::clone(&tiles),
            camera: camera.clone(),
            scene: Arc::clone(&payload.scene),
            integrator: Arc::clone(&integrator),
            sampler: Arc::clone(&sampler),
            film: Arc::clone(&payload.film),
            cancel: Arc::clone(&payload.cancel),
            tile_dim: payload.film_settings.tile_dim,
        };

        match tx.send(Some(thread_payload)) {
            Ok(()) => active_workers += 1,
            Err(SendError { .. }) => {
                tsuki_error!("Render manager: Worker has been terminated");
            }
        }
    }

    tsuki_info!(
        "Render manager: Render {} of '{}' started with {} threads, {} tiles",
        payload.render_id,
        payload.scene.name,
        active_workers,
        tile_count
    );

    *state = ManagerState {
        active_tiles_total: tile_count,
        active_render_id: payload.render_id,
        active_workers,
        cancel: Some(payload.cancel),
        start: Some(start),
        ..ManagerState::default()
    };
}

fn report_finished(to_parent: &Sender<Message>, state: &ManagerState) {
    let secs = state.start.map_or(0.0, |s| s.elapsed().as_secs_f32());
    let cancelled = state.active_tiles_done < state.active_tiles_total
        || state
            .cancel
            .as_ref()
            .map_or(false, |c| c.load(std::sync::atomic::Ordering::Relaxed));

    if cancelled {
        tsuki_info!(
            "Render manager: Render {} cancelled after {:.2}s, {}/{} tiles done",
            state.active_render_id,
            secs,
            state.active_tiles_done,
            state.active_tiles_total
        );
    } else {
        tsuki_info!(
            "Render manager: Render {} finished in {:.2}s, {:.2} Mrays/s",
            state.active_render_id,
            secs,
            (state.ray_count as f32) / secs.max(f32::EPSILON) / 1e6
        );
    }

    if let Err(why) = to_parent.send(Message::Finished {
        render_id: state.active_render_id,
        ray_count: state.ray_count,
        secs,
        cancelled,
    }) {
        tsuki_error!("Render manager: Error notifying parent on finish: {}", why);
    };
}

fn handle_worker_messages(
    from_workers: &Receiver<render_worker::Message>,
    to_parent: &Sender<Message>,
    state: &mut ManagerState,
) {
    let ManagerState {
        active_tiles_total,
        active_tiles_done,
        active_render_id,
        active_workers,
        ray_count,
        tile_infos,
        ..
    } = state;
    let avg_tile_window = 2 * (*active_workers).max(1);

    while let Ok(msg) = from_workers.try_recv() {
        match msg {
            render_worker::Message::Finished(WorkerInfo {
                thread_id,
                render_id,
            }) => {
                if render_id == *active_render_id {
                    tsuki_trace!("Render manager: Worker {} finished", thread_id);
                    *active_workers -= 1;
                } else {
                    tsuki_trace!("Render manager: Worker {} finished stale work", thread_id);
                }
            }
            render_worker::Message::TileDone {
                info,
                ray_count: rays,
                elapsed_s,
            } => {
                if info.render_id != *active_render_id {
                    continue;
                }

                *ray_count += rays;
                *active_tiles_done += 1;

                if tile_infos.len() >= avg_tile_window {
                    tile_infos.pop_front();
                }
                tile_infos.push_back(TileInfo { elapsed_s, rays });

                let workers = (*active_workers).max(1) as f32;
                let avg_s_per_tile = tile_infos
                    .iter()
                    .map(|TileInfo { elapsed_s, .. }| elapsed_s)
                    .sum::<f32>()
                    / (tile_infos.len() as f32);
                let approx_remaining_s = avg_s_per_tile
                    * ((*active_tiles_total - *active_tiles_done) as f32)
                    / workers;
                let current_rays_per_s = tile_infos
                    .iter()
                    // Sum of averages to downplay overtly expensive threads
                    .map(|&TileInfo { elapsed_s, rays }| (rays as f32) / elapsed_s.max(1e-6))
                    .sum::<f32>()
                    / (tile_infos.len() as f32)
                    * workers;

                tsuki_trace!(
                    "Render manager: {}/{} tiles done",
                    active_tiles_done,
                    active_tiles_total
                );

                if let Err(why) = to_parent.send(Message::Progress {
                    render_id: *active_render_id,
                    active_threads: *active_workers,
                    tiles_done: *active_tiles_done,
                    tiles_total: *active_tiles_total,
                    approx_remaining_s,
                    current_rays_per_s,
                }) {
                    tsuki_error!("Render manager: Error sending progress to parent: {}", why);
                }
            }
        }
    }
}
