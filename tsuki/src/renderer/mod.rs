mod render_manager;
mod render_worker;

use render_manager::RenderManager;

use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::{channel, SendError, TryRecvError},
    Arc, Mutex, PoisonError,
};

use crate::{
    film::{Film, FilmSettings},
    scene::Scene,
    settings::SettingsError,
    tsuki_debug,
};

pub enum RenderStatus {
    Progress {
        active_threads: usize,
        tiles_done: usize,
        tiles_total: usize,
        approx_remaining_s: f32,
        current_rays_per_s: f32,
    },
    Finished(RenderResult),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderResult {
    pub secs: f32,
    pub ray_count: usize,
    /// `true` if the render was stopped before every tile was done.
    pub cancelled: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Levels of reflection and refraction rays after the primary ray.
    pub max_depth: u32,
    /// Pixels are supersampled on an `aa_grid x aa_grid` grid.
    pub aa_grid: u16,
    /// Jitter samples inside their grid cells instead of using the cell centers.
    pub jitter_samples: bool,
    pub seed: u64,
    /// Number of render threads, all logical cores if not set.
    pub thread_count: Option<usize>,
    pub use_environment_map: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_depth: 5,
            aa_grid: 1,
            jitter_samples: false,
            seed: 0x73B9_642E_74AC_471C,
            thread_count: None,
            use_environment_map: false,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.aa_grid == 0 {
            return Err(SettingsError::Invalid("aa_grid has to be at least 1".into()));
        }
        if self.thread_count == Some(0) {
            return Err(SettingsError::Invalid(
                "thread_count has to be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl FilmSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tile_dim == 0 {
            return Err(SettingsError::Invalid("tile_dim has to be at least 1".into()));
        }
        if self.res.x == 0 || self.res.y == 0 {
            return Err(SettingsError::Invalid(format!(
                "Empty resolution {}x{}",
                self.res.x, self.res.y
            )));
        }
        Ok(())
    }
}

/// Asynchronous tiled renderer.
///
/// Renders run on a manager thread that feeds tiles to a pool of worker threads.
pub struct Renderer {
    manager: Option<RenderManager>,
    render_in_progress: bool,
    render_id: usize,
    cancel: Arc<AtomicBool>,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            manager: None,
            render_in_progress: false,
            render_id: 0,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Checks if the render task is active.
    pub fn is_active(&self) -> bool {
        self.render_in_progress
    }

    /// Launch a new render task, overriding the previous one if one is already running.
    ///
    /// Panics if the index of `scene` hasn't been built.
    pub fn launch(
        &mut self,
        scene: Arc<Scene>,
        film: Arc<Mutex<Film>>,
        film_settings: FilmSettings,
        render_settings: RenderSettings,
    ) -> Result<(), SettingsError> {
        film_settings.validate()?;
        render_settings.validate()?;
        assert!(
            scene.index_built(),
            "Renderer: Scene '{}' has no index",
            scene.name
        );

        // Stop the previous render early, new tiles won't match its film generation anyway
        self.cancel.store(true, Ordering::Relaxed);
        self.cancel = Arc::new(AtomicBool::new(false));
        self.render_id += 1;

        let manager = match self.manager.take() {
            Some(manager) => manager,
            None => {
                let (tx, manager_rx) = channel();
                let (manager_tx, rx) = channel();
                let handle = crate::expect!(
                    render_manager::launch(manager_tx, manager_rx),
                    "Failed to spawn RenderManager"
                );
                RenderManager { tx, rx, handle }
            }
        };

        tsuki_debug!("launch: Sending new payload");
        match manager.tx.send(Some(render_manager::Payload {
            render_id: self.render_id,
            scene,
            film,
            film_settings,
            render_settings,
            cancel: Arc::clone(&self.cancel),
        })) {
            Ok(_) => {
                self.render_in_progress = true;
            }
            Err(SendError(_)) => {
                panic!("launch: Render manager has been terminated");
            }
        }
        self.manager = Some(manager);

        Ok(())
    }

    /// Returns the newest status of the render task if there is news.
    pub fn check_status(&mut self) -> Option<RenderStatus> {
        let manager = match &self.manager {
            Some(manager) if self.render_in_progress => manager,
            _ => return None,
        };

        let mut ret = None;
        loop {
            match manager.rx.try_recv() {
                Ok(render_manager::Message::Finished {
                    render_id,
                    ray_count,
                    secs,
                    cancelled,
                }) => {
                    if render_id == self.render_id {
                        tsuki_debug!("check_status: Render job has finished");
                        self.render_in_progress = false;
                        ret = Some(RenderStatus::Finished(RenderResult {
                            secs,
                            ray_count,
                            cancelled,
                        }));
                        break;
                    }
                    tsuki_debug!("check_status: Stale render job has finished");
                }
                Ok(render_manager::Message::Progress {
                    render_id,
                    active_threads,
                    tiles_done,
                    tiles_total,
                    approx_remaining_s,
                    current_rays_per_s,
                }) => {
                    if render_id == self.render_id {
                        ret = Some(RenderStatus::Progress {
                            active_threads,
                            tiles_done,
                            tiles_total,
                            approx_remaining_s,
                            current_rays_per_s,
                        });
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    panic!("check_status: Render manager has been terminated");
                }
            }
        }
        ret
    }

    /// Waits for the render task to end and returns its result.
    pub fn wait_result(&mut self) -> Result<RenderResult, String> {
        let manager = match &self.manager {
            Some(manager) if self.render_in_progress => manager,
            _ => return Err("No render in progress".into()),
        };

        loop {
            match manager.rx.recv() {
                Ok(render_manager::Message::Finished {
                    render_id,
                    ray_count,
                    secs,
                    cancelled,
                }) => {
                    if render_id == self.render_id {
                        tsuki_debug!("wait_result: Render job has finished");
                        self.render_in_progress = false;
                        return Ok(RenderResult {
                            secs,
                            ray_count,
                            cancelled,
                        });
                    }
                    assert!(
                        render_id < self.render_id,
                        "Render result appears to be from the future"
                    );
                    tsuki_debug!("wait_result: Stale render job has finished");
                }
                Ok(render_manager::Message::Progress { .. }) => (),
                Err(_) => return Err("Render manager disconnected".into()),
            }
        }
    }

    /// Asks the workers to stop after the pixel they are on.
    ///
    /// The render still reports as finished, with untraced pixels left black.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn kill(&mut self) {
        self.cancel();
        if let Some(RenderManager { tx, handle, .. }) = self.manager.take() {
            drop(tx.send(None));
            if handle.join().is_err() {
                crate::tsuki_error!("kill: Render manager panicked");
            }
        }
        self.render_in_progress = false;
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.kill();
    }
}

/// Renders `scene` into a new [Film], blocking until every tile is done.
pub fn render(
    scene: Arc<Scene>,
    film_settings: FilmSettings,
    render_settings: RenderSettings,
) -> Result<(Film, RenderResult), SettingsError> {
    let film = Arc::new(Mutex::new(Film::new(film_settings.res)));
    let mut renderer = Renderer::new();
    renderer.launch(scene, Arc::clone(&film), film_settings, render_settings)?;

    let result = match renderer.wait_result() {
        Ok(result) => result,
        Err(why) => panic!("Render failed: {}", why),
    };
    // Workers hold on to their payload until the pool is killed
    renderer.kill();

    let film = match Arc::try_unwrap(film) {
        Ok(film) => film.into_inner().unwrap_or_else(PoisonError::into_inner),
        Err(film) => film.lock().unwrap_or_else(PoisonError::into_inner).clone(),
    };
    Ok((film, result))
}
