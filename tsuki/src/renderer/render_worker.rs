use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, RecvError, Sender, TryRecvError},
        Arc, Mutex, PoisonError,
    },
    time::Instant,
};

use crate::{
    camera::Camera,
    film::{Film, FilmTile},
    integrators::Integrator,
    math::Spectrum,
    sampling::Sampler,
    scene::Scene,
    tsuki_debug, tsuki_error, tsuki_trace,
};

pub enum Message {
    TileDone {
        info: WorkerInfo,
        ray_count: usize,
        elapsed_s: f32,
    },
    Finished(WorkerInfo),
}

#[derive(Clone, Copy)]
pub struct WorkerInfo {
    pub render_id: usize,
    pub thread_id: usize,
}

pub struct Payload {
    pub render_id: usize,
    pub tiles: Arc<Mutex<VecDeque<FilmTile>>>,
    pub camera: Camera,
    pub scene: Arc<Scene>,
    pub integrator: Arc<dyn Integrator>,
    pub sampler: Arc<dyn Sampler>,
    pub film: Arc<Mutex<Film>>,
    pub cancel: Arc<AtomicBool>,
    pub tile_dim: u16,
}

pub fn launch(
    thread_id: usize,
    to_parent: &Sender<Message>,
    from_parent: &Receiver<Option<Payload>>,
) {
    tsuki_debug!("Render thread {}: Begin", thread_id);

    let mut tile_pixels = Vec::new();

    'thread: loop {
        let mut worker_info = WorkerInfo {
            render_id: 0,
            thread_id,
        };
        let mut payload: Option<Payload> = None;

        // Blocking recv to avoid spinlock when there is no need to message to parent
        let mut newest_msg = match from_parent.recv() {
            Ok(msg) => Some(Ok(msg)),
            Err(RecvError {}) => {
                tsuki_debug!("Render thread {}: Receive channel disconnected", thread_id);
                break 'thread;
            }
        };
        'work: loop {
            // Handle messages before getting next tile to ensure the tile we get
            // matches the held film
            if handle_manager_messages(
                thread_id,
                newest_msg.take(),
                from_parent,
                &mut worker_info,
                &mut payload,
            ) {
                break 'thread;
            }

            let p = match payload.as_ref() {
                Some(p) => p,
                None => continue 'work,
            };

            let tile = match pop_tile_or_signal_finish(&worker_info, p, to_parent) {
                Some(tile) => tile,
                None => break 'work,
            };

            let dim = p.tile_dim as usize;
            if tile_pixels.len() < dim * dim {
                tile_pixels.resize(dim * dim, Spectrum::zeros());
            }

            let tile_start = Instant::now();
            match render_tile(thread_id, &tile, &mut tile_pixels, p, from_parent) {
                RenderTileResult::Interrupted(Some(msg)) => newest_msg = Some(Ok(msg)),
                // Cancelled, the finish is signaled on the next pop
                RenderTileResult::Interrupted(None) => (),
                RenderTileResult::Rendered { ray_count } => update_tile(
                    &worker_info,
                    &tile,
                    &tile_pixels,
                    p,
                    ray_count,
                    tile_start,
                    to_parent,
                ),
            }
        }
    }

    tsuki_debug!("Render thread {}: End", thread_id);
}

// Returns `true` if manager signaled kill
fn handle_manager_messages(
    thread_id: usize,
    newest_msg: Option<Result<Option<Payload>, RecvError>>,
    from_parent: &Receiver<Option<Payload>>,
    worker_info: &mut WorkerInfo,
    payload: &mut Option<Payload>,
) -> bool {
    match newest_msg.map_or_else(
        || from_parent.try_recv(),
        |r| r.map_err(TryRecvError::from),
    ) {
        Ok(Some(new_payload)) => {
            tsuki_debug!("Render thread {}: Received new payload", thread_id);
            worker_info.render_id = new_payload.render_id;
            *payload = Some(new_payload);
        }
        Ok(None) => {
            tsuki_debug!("Render thread {}: Killed by parent", thread_id);
            return true;
        }
        Err(TryRecvError::Disconnected) => {
            tsuki_debug!("Render thread {}: Receive channel disconnected", thread_id);
            return true;
        }
        Err(TryRecvError::Empty) => (),
    }

    false
}

fn pop_tile_or_signal_finish(
    worker_info: &WorkerInfo,
    payload: &Payload,
    to_parent: &Sender<Message>,
) -> Option<FilmTile> {
    let tile = if payload.cancel.load(Ordering::Relaxed) {
        None
    } else {
        let mut tiles = payload.tiles.lock().unwrap_or_else(PoisonError::into_inner);
        tiles.pop_front()
    };

    match tile {
        Some(tile) => Some(tile),
        None => {
            tsuki_trace!("Render thread {}: Signal done", worker_info.thread_id);

            if let Err(why) = to_parent.send(Message::Finished(*worker_info)) {
                tsuki_error!(
                    "Render thread {}: Error notifying parent on finish: {}",
                    worker_info.thread_id,
                    why
                );
            };

            None
        }
    }
}

#[allow(clippy::large_enum_variant)] // This is not in the hot path, seems to make sense
enum RenderTileResult {
    // Holds the message from the manager, or nothing if the render was cancelled
    Interrupted(Option<Option<Payload>>),
    Rendered { ray_count: usize },
}

fn render_tile(
    thread_id: usize,
    tile: &FilmTile,
    tile_pixels: &mut [Spectrum<f32>],
    payload: &Payload,
    from_parent: &Receiver<Option<Payload>>,
) -> RenderTileResult {
    tsuki_trace!("Render thread {}: Render tile {:?}", thread_id, tile.bb);

    let mut interrupted = false;
    let mut received_msg = None;
    let ray_count = payload.integrator.render(
        &payload.scene,
        &payload.camera,
        payload.sampler.as_ref(),
        tile,
        tile_pixels,
        &mut || {
            if payload.cancel.load(Ordering::Relaxed) {
                tsuki_debug!("Render thread {}: Cancelled", thread_id);
                interrupted = true;
            } else if let Ok(msg) = from_parent.try_recv() {
                // Let's have low latency kills for more interactive use
                tsuki_debug!("Render thread {}: Interrupted by parent", thread_id);
                received_msg = Some(msg);
                interrupted = true;
            }
            interrupted
        },
    );

    if interrupted {
        RenderTileResult::Interrupted(received_msg)
    } else {
        RenderTileResult::Rendered { ray_count }
    }
}

fn update_tile(
    worker_info: &WorkerInfo,
    tile: &FilmTile,
    tile_pixels: &[Spectrum<f32>],
    payload: &Payload,
    ray_count: usize,
    tile_start: Instant,
    to_parent: &Sender<Message>,
) {
    tsuki_trace!(
        "Render thread {}: Update tile {:?}",
        worker_info.thread_id,
        tile.bb
    );
    {
        let mut film = payload.film.lock().unwrap_or_else(PoisonError::into_inner);
        if film.matches(tile) {
            film.update_tile(tile, tile_pixels);
        } else {
            tsuki_trace!("Render thread {}: Stale tile", worker_info.thread_id);
        }
    }

    if let Err(why) = to_parent.send(Message::TileDone {
        info: *worker_info,
        ray_count,
        elapsed_s: tile_start.elapsed().as_secs_f32(),
    }) {
        tsuki_error!(
            "Render thread {}: Error notifying parent on tile done: {}",
            worker_info.thread_id,
            why
        );
    };
}
