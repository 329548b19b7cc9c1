//! Project enhancement
//!
//! Decorates repository records with tech stack, features, demo
//! availability and a live-metrics snapshot. Projects with a homepage get
//! a HEAD probe whose outcome sets the snapshot's status and latency.

use std::time::{Duration, Instant};

use chrono::Utc;
use futures::future::join_all;
use rand::Rng;
use tracing::{debug, warn};

use crate::error::{LiveDataError, Result};
use crate::models::{Project, ProjectLiveMetrics, SiteStatus};

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
/// Response time reported when a probe never got an answer
const PROBE_FAILURE_RESPONSE_MS: u64 = 5_000;
const DEFAULT_RESPONSE_MS: u64 = 145;
const DEFAULT_PERFORMANCE_SCORE: u32 = 95;

struct Enhancement {
    slug: &'static str,
    tech_stack: &'static [&'static str],
    features: &'static [&'static str],
    demo_available: bool,
    performance_score: u32,
}

const KNOWN_PROJECTS: &[Enhancement] = &[
    Enhancement {
        slug: "portfolio-website",
        tech_stack: &["Next.js", "TypeScript", "Tailwind CSS", "Framer Motion", "Vercel"],
        features: &[
            "Responsive Design",
            "Dark Mode",
            "SEO Optimized",
            "Fast Loading",
            "Mobile First",
        ],
        demo_available: true,
        performance_score: 98,
    },
    Enhancement {
        slug: "tablecraft",
        tech_stack: &["React", "Node.js", "MongoDB", "Express", "Socket.io"],
        features: &[
            "Real-time Updates",
            "User Authentication",
            "Data Visualization",
            "Export Features",
        ],
        demo_available: true,
        performance_score: 94,
    },
    Enhancement {
        slug: "e-commerce-app",
        tech_stack: &["React Native", "Firebase", "Stripe", "Redux"],
        features: &[
            "Payment Integration",
            "Push Notifications",
            "Offline Support",
            "Cart Management",
        ],
        demo_available: false,
        performance_score: 92,
    },
];

fn known_enhancement(slug: &str) -> Option<&'static Enhancement> {
    KNOWN_PROJECTS.iter().find(|e| e.slug == slug)
}

/// Lowercase name with whitespace runs collapsed to `-`.
pub fn project_slug(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Outcome of a homepage HEAD probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub status: SiteStatus,
    pub response_time: u64,
}

#[derive(Debug, Clone)]
pub struct ProjectEnhancer {
    http: reqwest::Client,
    probe_timeout: Duration,
}

impl ProjectEnhancer {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("folio_live/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LiveDataError::Internal(e.to_string()))?;
        Ok(Self {
            http,
            probe_timeout: PROBE_TIMEOUT,
        })
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Enhances every project concurrently, preserving order.
    pub async fn enhance_all(&self, projects: Vec<Project>) -> Vec<Project> {
        let enhanced = join_all(projects.into_iter().map(|p| self.enhance(p))).await;
        debug!(count = enhanced.len(), "Enhanced projects with live data");
        enhanced
    }

    pub async fn enhance(&self, mut project: Project) -> Project {
        let known = known_enhancement(&project_slug(&project.name));

        let mut metrics = ProjectLiveMetrics {
            uptime: 99.9,
            response_time: DEFAULT_RESPONSE_MS,
            last_deployment: Utc::now(),
            status: SiteStatus::Active,
            visitors_today: rand::thread_rng().gen_range(50..550),
            performance_score: known
                .map(|k| k.performance_score)
                .unwrap_or(DEFAULT_PERFORMANCE_SCORE),
        };

        if let Some(homepage) = project.homepage_url() {
            debug!(project = %project.name, homepage, "Checking homepage health");
            let probe = self.probe(homepage).await;
            metrics.status = probe.status;
            metrics.response_time = probe.response_time;
        }

        if let Some(known) = known {
            project.tech_stack = Some(known.tech_stack.iter().map(|s| s.to_string()).collect());
            project.features = Some(known.features.iter().map(|s| s.to_string()).collect());
        }
        project.demo_available = Some(
            known
                .map(|k| k.demo_available)
                .unwrap_or_else(|| project.homepage_url().is_some()),
        );
        project.live_metrics = Some(metrics);
        project
    }

    /// HEAD request against `url`; never fails.
    pub async fn probe(&self, url: &str) -> ProbeResult {
        let start = Instant::now();
        let result = self
            .http
            .head(url)
            .timeout(self.probe_timeout)
            .send()
            .await;

        match result {
            Ok(response) => ProbeResult {
                status: if response.status().is_success() {
                    SiteStatus::Active
                } else {
                    SiteStatus::Error
                },
                response_time: start.elapsed().as_millis() as u64,
            },
            Err(e) => {
                warn!(url, error = %e, "Health check failed");
                ProbeResult {
                    status: SiteStatus::Error,
                    response_time: PROBE_FAILURE_RESPONSE_MS,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str, homepage: Option<&str>) -> Project {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": name,
            "html_url": "https://github.com/u/x",
            "homepage": homepage,
            "created_at": "2023-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_project_slug() {
        assert_eq!(project_slug("Portfolio  Website"), "portfolio-website");
        assert_eq!(project_slug("tableCraft"), "tablecraft");
    }

    #[tokio::test]
    async fn test_enhance_known_project_without_homepage() {
        let enhancer = ProjectEnhancer::new().unwrap();
        let p = enhancer.enhance(project("tableCraft", None)).await;

        assert_eq!(p.tech_stack.as_ref().unwrap()[0], "React");
        assert_eq!(p.demo_available, Some(true));
        let metrics = p.live_metrics.unwrap();
        assert_eq!(metrics.status, SiteStatus::Active);
        assert_eq!(metrics.performance_score, 94);
        assert_eq!(metrics.response_time, DEFAULT_RESPONSE_MS);
        assert!((50..550).contains(&metrics.visitors_today));
    }

    #[tokio::test]
    async fn test_enhance_unknown_project_without_homepage() {
        let enhancer = ProjectEnhancer::new().unwrap();
        let p = enhancer.enhance(project("scratchpad", Some("   "))).await;

        assert!(p.tech_stack.is_none());
        assert_eq!(p.demo_available, Some(false));
        assert_eq!(p.live_metrics.unwrap().performance_score, DEFAULT_PERFORMANCE_SCORE);
    }

    #[tokio::test]
    async fn test_probe_unreachable_reports_error() {
        let enhancer = ProjectEnhancer::new()
            .unwrap()
            .with_probe_timeout(Duration::from_millis(500));
        // Port 9 (discard) on localhost is expected to refuse connections
        let probe = enhancer.probe("http://127.0.0.1:9/").await;

        assert_eq!(probe.status, SiteStatus::Error);
        assert_eq!(probe.response_time, PROBE_FAILURE_RESPONSE_MS);
    }
}
