//! Application state
//!
//! Configuration and shared engines handed to every handler.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tera::{Context, Tera};

use crate::core::visits::VisitTracker;
use crate::error::{AppError, AppResult};

/// Core application state
#[derive(Debug)]
pub struct AppState {
    pub bind_address: SocketAddr,
    pub static_dir: String,
    templates: Tera,
    pub tracker: VisitTracker,
    pub server_start_time: Instant,
    is_running: AtomicBool,
}

impl AppState {
    /// Create application state, compiling the templates under
    /// `templates_dir`.
    pub fn new(bind_address: SocketAddr, templates_dir: &str, static_dir: &str) -> AppResult<Self> {
        let pattern = format!("{}/**/*.html", templates_dir.trim_end_matches('/'));
        let templates = Tera::new(&pattern).map_err(|source| AppError::TemplateInit {
            dir: templates_dir.to_string(),
            source,
        })?;
        if templates.get_template_names().next().is_none() {
            return Err(AppError::TemplateInit {
                dir: templates_dir.to_string(),
                source: tera::Error::msg("no templates found"),
            });
        }

        Ok(Self {
            bind_address,
            static_dir: static_dir.to_string(),
            templates,
            tracker: VisitTracker::new(),
            server_start_time: Instant::now(),
            is_running: AtomicBool::new(true),
        })
    }

    /// Render one of the compiled templates.
    pub fn render(&self, template: &str, context: &Context) -> AppResult<String> {
        self.templates
            .render(template, context)
            .map_err(|source| AppError::Template {
                template: template.to_string(),
                source,
            })
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    pub fn set_running(&self, running: bool) {
        self.is_running.store(running, Ordering::Relaxed);
    }

    /// Server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.server_start_time.elapsed().as_secs()
    }
}
