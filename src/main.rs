use anyhow::Result;
use fidtrack_config::TrackerConfig;
use fidtrack_fusion::{FusionSettings, SensorFeed, SensorSample, TrackerSession};
use fidtrack_geometry::{projector, resolver, CameraAttitude, CameraIntrinsics};
use glam::{DVec2, Vec3};
use std::time::Duration;
use tracing::{info, warn};

/// Synthetic sensor source: a stationary, level device facing the anchor
/// heading, with the small constant gyro drift real MEMS parts show. Stands
/// in for the platform sensor stack during development, the way a mock
/// client would for missing hardware.
async fn synthetic_sensor_loop(feed: SensorFeed) {
    let accel = Vec3::new(0.0, 0.0, 9.81);
    let mag = Vec3::new(0.0, 22.0, -40.0);
    let gyro_drift = Vec3::new(0.0, 0.0, 0.002);

    let mut ticker = tokio::time::interval(Duration::from_millis(10));
    let mut t_ns: u64 = 0;
    loop {
        ticker.tick().await;
        t_ns += 10_000_000;
        feed.push_mag(SensorSample::new(mag, t_ns));
        feed.push_accel(SensorSample::new(accel, t_ns));
        feed.push_gyro(SensorSample::new(gyro_drift, t_ns));
    }
}

/// A centred 100x100 px detection, standing in for the marker decoder.
fn demo_detection(intrinsics: &CameraIntrinsics) -> Vec<DVec2> {
    let center = intrinsics.center();
    let half = 50.0;
    vec![
        DVec2::new(center.x - half, center.y - half),
        DVec2::new(center.x - half, center.y + half),
        DVec2::new(center.x + half, center.y + half),
        DVec2::new(center.x + half, center.y - half),
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fidtrack_app=info,fidtrack_fusion=info".into()),
        )
        .init();

    info!("fidtrack starting");

    let config = fidtrack_config::load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        TrackerConfig::default()
    });

    let settings = FusionSettings {
        coefficient: config.fusion.filter_coefficient,
        calibration_ticks: config.fusion.calibration_ticks,
        tick_interval: Duration::from_millis(config.fusion.tick_interval_ms),
        anchor_azimuth: config.fusion.anchor_azimuth_rad,
    };
    let intrinsics = CameraIntrinsics {
        horizontal_fov: config.camera.horizontal_fov_rad,
        resolution: config.camera.resolution,
    };
    let marker_edge_len = config.marker.edge_length_cm;

    let session = TrackerSession::start(settings);
    let driver = tokio::spawn(synthetic_sensor_loop(session.feed()));

    let mut orientation_rx = session.subscribe();
    let mut demo_resolved = false;

    loop {
        tokio::select! {
            changed = orientation_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = *orientation_rx.borrow_and_update();
                if snapshot.tick % 10 == 0 {
                    info!(
                        tick = snapshot.tick,
                        azimuth_deg = snapshot.orientation.azimuth.to_degrees(),
                        pitch_deg = snapshot.orientation.pitch.to_degrees(),
                        roll_deg = snapshot.orientation.roll.to_degrees(),
                        stale = snapshot.compass_stale,
                        "fused orientation"
                    );
                }

                // Once calibrated, run one synthetic detection through the
                // geometry path, where the decoder collaborator would hand
                // us corners.
                if snapshot.calibrated && !demo_resolved {
                    demo_resolved = true;
                    let attitude = CameraAttitude {
                        azimuth: (snapshot.orientation.azimuth
                            - config.fusion.anchor_azimuth_rad) as f64,
                        elevation: snapshot.orientation.pitch as f64,
                    };
                    match resolver::resolve(
                        &demo_detection(&intrinsics),
                        &intrinsics,
                        marker_edge_len,
                        attitude,
                    ) {
                        Ok(position) => {
                            let world = projector::world_frame(&attitude, &position);
                            info!(
                                rad_x = position.rad_x,
                                rad_y = position.rad_y,
                                distance_cm = position.distance,
                                world_x = world.x,
                                world_y = world.y,
                                world_z = world.z,
                                "demo marker resolved"
                            );
                        }
                        Err(e) => warn!(%e, "demo marker resolution failed"),
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }

    session.stop();
    driver.abort();
    Ok(())
}
