use crate::camera::{CameraSession, FileCamera};
use crate::capture::{CaptureOrchestrator, CommitOutcome, PersistenceCommitter};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::audit::audit_or_warn;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::gallery::DirectoryGallery;
use crate::location::{FixedLocation, LocationProbe};
use crate::models::Coordinates;
use crate::permissions::{PermissionBroker, StaticPermissions};
use crate::ui::messages::{info, success, warning};
use std::sync::Arc;

/// Handle the `capture` command: one full sampling session.
pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Capture {
        sentiment,
        clip,
        duration,
        lat,
        lng,
        deny,
    } = cmd
    {
        let pool = DbPool::shared(cfg.database_path())?;
        let permissions: Arc<dyn PermissionBroker> =
            Arc::new(StaticPermissions::denying(deny.iter().copied()));

        let fix = match (lat, lng) {
            (Some(la), Some(ln)) => Some(Coordinates::new(*la, *ln)),
            _ => None,
        };

        let camera = CameraSession::new(
            Box::new(FileCamera::new(clip.clone(), cfg.capture_path())),
            permissions.clone(),
        );
        let committer = PersistenceCommitter::new(
            pool.clone(),
            cfg.media_path(),
            Arc::new(DirectoryGallery::new(cfg.gallery_path())),
            permissions.clone(),
            cfg.album.clone(),
        );
        let mut session = CaptureOrchestrator::new(camera, committer, cfg.initial_sentiment());

        // location runs on its own; submit takes whatever has arrived
        let probe = LocationProbe::new(permissions.clone(), Arc::new(FixedLocation(fix)));
        session.attach_location(probe.spawn());

        let state = session.camera().initialize().await;
        info(format!("Camera: {}", state));

        if clip.is_some() {
            match session.record_video_for(*duration).await {
                Ok(recorded) => info(format!(
                    "Clip recorded ({:.1}s): {}",
                    recorded.duration.as_secs_f64(),
                    recorded.path.display()
                )),
                Err(e) => warning(format!("Continuing without video: {}", e)),
            }
        }

        if let Some(value) = sentiment {
            let applied = session.update_sentiment(*value);
            if i64::from(applied.value()) != *value {
                warning(format!("Sentiment {} clamped to {}", value, applied));
            }
        }

        tokio::task::yield_now().await;

        match session.submit().await {
            Ok(outcome) => {
                report(&outcome);
                pool.with_conn(|conn| {
                    audit_or_warn(
                        conn,
                        "capture",
                        &outcome.record.id.to_string(),
                        &summary(&outcome),
                    );
                    Ok(())
                })?;
            }
            Err(e) => {
                pool.with_conn(|conn| {
                    audit_or_warn(conn, "commit_failed", "", &e.to_string());
                    Ok(())
                })?;
                return Err(e);
            }
        }
    }

    Ok(())
}

fn summary(outcome: &CommitOutcome) -> String {
    let rec = &outcome.record;
    format!(
        "sentiment={} video={} location={}",
        rec.sentiment,
        rec.video_path.is_some(),
        rec.location.is_some()
    )
}

fn report(outcome: &CommitOutcome) {
    let rec = &outcome.record;
    success(format!("Record #{} saved (sentiment {})", rec.id, rec.sentiment));

    match &rec.video_path {
        Some(p) => println!("   🎞️  Video    : {}", p.display()),
        None => println!("   🎞️  Video    : -"),
    }
    match &rec.location {
        Some(c) => println!("   📍 Location : {}, {}", c.latitude, c.longitude),
        None => println!("   📍 Location : -"),
    }
    if let Some(copy) = &outcome.gallery_copy {
        println!("   🖼️  Gallery  : {}", copy.display());
    }
}
