//! Synthetic telemetry payloads
//!
//! Substituted for the metrics, deployments and health endpoints when the
//! remote answers with a non-success status. Each generator is pure value
//! construction from the current time and random draws; the `_with` forms
//! take both explicitly.

use chrono::{DateTime, Duration, Utc};
use rand::{seq::SliceRandom, Rng};

use crate::models::{
    DeploymentInfo, DeploymentStatus, LighthouseScore, LiveMetrics, MetricsStatus,
    OverallStatus, ProjectHealth, SslCertificate,
};

/// Number of records in a mock deployment list
pub const MOCK_DEPLOYMENT_COUNT: usize = 5;

const DEPLOYMENT_STATUS_WEIGHTS: [DeploymentStatus; 5] = [
    DeploymentStatus::Ready,
    DeploymentStatus::Ready,
    DeploymentStatus::Ready,
    DeploymentStatus::Building,
    DeploymentStatus::Error,
];

const SHA_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// == Metrics ==

pub fn generate_metrics() -> LiveMetrics {
    generate_metrics_with(&mut rand::thread_rng(), Utc::now())
}

pub fn generate_metrics_with<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> LiveMetrics {
    LiveMetrics {
        timestamp: now,
        uptime: 99.9,
        response_time: rng.gen_range(50..250),
        status: if rng.gen_bool(0.9) {
            MetricsStatus::Active
        } else {
            MetricsStatus::Error
        },
        concurrent_users: rng.gen_range(1..51),
        api_calls_today: rng.gen_range(100..1100),
        error_rate: rng.gen_range(0.0..2.0),
        performance_score: rng.gen_range(80..100),
    }
}

// == Deployments ==

pub fn generate_deployments() -> Vec<DeploymentInfo> {
    generate_deployments_with(&mut rand::thread_rng(), Utc::now())
}

/// Newest first, one day apart.
pub fn generate_deployments_with<R: Rng>(
    rng: &mut R,
    now: DateTime<Utc>,
) -> Vec<DeploymentInfo> {
    (0..MOCK_DEPLOYMENT_COUNT)
        .map(|i| DeploymentInfo {
            id: format!("deploy-{}", i),
            status: DEPLOYMENT_STATUS_WEIGHTS
                .choose(rng)
                .copied()
                .unwrap_or(DeploymentStatus::Ready),
            url: format!("https://deployment-{}.vercel.app", i),
            created_at: now - Duration::days(i as i64),
            duration: rng.gen_range(30..330),
            commit_sha: random_sha(rng),
            commit_message: format!("Update project functionality {}", i + 1),
            branch: if i == 0 {
                "main".to_string()
            } else {
                format!("feature/update-{}", i)
            },
        })
        .collect()
}

fn random_sha<R: Rng>(rng: &mut R) -> String {
    (0..7)
        .map(|_| SHA_ALPHABET[rng.gen_range(0..SHA_ALPHABET.len())] as char)
        .collect()
}

// == Health ==

pub fn generate_health() -> ProjectHealth {
    generate_health_with(&mut rand::thread_rng(), Utc::now())
}

pub fn generate_health_with<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> ProjectHealth {
    let is_healthy = rng.gen_bool(0.8);

    let (overall_status, uptime_24h) = if is_healthy {
        (OverallStatus::Healthy, 99.9)
    } else if rng.gen_bool(0.5) {
        (OverallStatus::Warning, rng.gen_range(80.0..100.0))
    } else {
        (OverallStatus::Critical, rng.gen_range(80.0..100.0))
    };

    let week_ms = 7 * 24 * 60 * 60 * 1000;

    ProjectHealth {
        overall_status,
        last_check: now,
        uptime_24h,
        avg_response_time: rng.gen_range(50..250),
        ssl_certificate: SslCertificate {
            valid: true,
            expires_at: now + Duration::days(90),
        },
        lighthouse_score: LighthouseScore {
            performance: rng.gen_range(80..100),
            accessibility: rng.gen_range(80..100),
            best_practices: rng.gen_range(80..100),
            seo: rng.gen_range(80..100),
            last_audit: now - Duration::milliseconds(rng.gen_range(0..week_ms)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_metrics_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc::now();

        for _ in 0..200 {
            let m = generate_metrics_with(&mut rng, now);
            assert_eq!(m.timestamp, now);
            assert_eq!(m.uptime, 99.9);
            assert!((50..250).contains(&m.response_time));
            assert!(matches!(m.status, MetricsStatus::Active | MetricsStatus::Error));
            assert!((1..51).contains(&m.concurrent_users));
            assert!((100..1100).contains(&m.api_calls_today));
            assert!((0.0..2.0).contains(&m.error_rate));
            assert!((80..100).contains(&m.performance_score));
        }
    }

    #[test]
    fn test_metrics_mostly_active() {
        let mut rng = StdRng::seed_from_u64(11);
        let now = Utc::now();

        let active = (0..1000)
            .filter(|_| generate_metrics_with(&mut rng, now).status == MetricsStatus::Active)
            .count();
        assert!(active > 800, "expected ~90% active, got {}", active);
    }

    #[test]
    fn test_deployments_shape() {
        let mut rng = StdRng::seed_from_u64(3);
        let now = Utc::now();
        let deployments = generate_deployments_with(&mut rng, now);

        assert_eq!(deployments.len(), MOCK_DEPLOYMENT_COUNT);
        assert_eq!(deployments[0].branch, "main");
        assert_eq!(deployments[2].branch, "feature/update-2");
        assert_eq!(deployments[4].commit_message, "Update project functionality 5");

        for (i, pair) in deployments.windows(2).enumerate() {
            assert_eq!(pair[0].created_at - pair[1].created_at, Duration::days(1));
            assert_eq!(pair[0].id, format!("deploy-{}", i));
        }
        for d in &deployments {
            assert_eq!(d.commit_sha.len(), 7);
            assert!(d.commit_sha.bytes().all(|b| SHA_ALPHABET.contains(&b)));
            assert!((30..330).contains(&d.duration));
            assert_ne!(d.status, DeploymentStatus::Canceled);
        }
    }

    #[test]
    fn test_health_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = Utc::now();

        for _ in 0..200 {
            let h = generate_health_with(&mut rng, now);
            match h.overall_status {
                OverallStatus::Healthy => assert_eq!(h.uptime_24h, 99.9),
                _ => assert!((80.0..100.0).contains(&h.uptime_24h)),
            }
            assert!(h.ssl_certificate.valid);
            assert_eq!(h.ssl_certificate.expires_at, now + Duration::days(90));
            let score = &h.lighthouse_score;
            for s in [score.performance, score.accessibility, score.best_practices, score.seo] {
                assert!((80..100).contains(&s));
            }
            assert!(score.last_audit <= now);
            assert!(score.last_audit > now - Duration::days(7));
        }
    }

    #[test]
    fn test_default_generators_use_current_time() {
        let before = Utc::now();
        let m = generate_metrics();
        assert!(m.timestamp >= before);
        assert_eq!(generate_deployments().len(), MOCK_DEPLOYMENT_COUNT);
        assert!(generate_health().last_check >= before);
    }
}
