use super::{COOLDOWN_DELAY, CameraDevice, CameraState, MAX_RECORDING, RecordedClip};
use crate::errors::CameraError;
use crate::permissions::{PermissionBroker, PermissionKind};
use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard as StdMutexGuard};
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;

struct Inner {
    state: CameraState,
    /// Whether the owning screen is in the foreground.
    focused: bool,
    /// A hardware open is in flight.
    acquiring: bool,
}

/// Owner of the exclusive camera/microphone handle.
///
/// All transitions are guarded by the current [`CameraState`]. The state lock
/// is never held across an await; the device lock is held for the duration
/// of an open or a capture.
pub struct CameraSession {
    device: Mutex<Box<dyn CameraDevice>>,
    permissions: Arc<dyn PermissionBroker>,
    inner: StdMutex<Inner>,
}

impl CameraSession {
    pub fn new(device: Box<dyn CameraDevice>, permissions: Arc<dyn PermissionBroker>) -> Self {
        Self {
            device: Mutex::new(device),
            permissions,
            inner: StdMutex::new(Inner {
                state: CameraState::Uninitialized,
                focused: true,
                acquiring: false,
            }),
        }
    }

    fn lock(&self) -> StdMutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn state(&self) -> CameraState {
        self.lock().state
    }

    /// The live preview may be rendered only while this is true.
    pub fn preview_visible(&self) -> bool {
        let inner = self.lock();
        inner.focused && inner.state == CameraState::Ready
    }

    /// Drives the enabled/disabled state of the record control.
    pub fn can_record(&self) -> bool {
        self.preview_visible()
    }

    pub fn has_recorded(&self) -> bool {
        self.state() == CameraState::Recorded
    }

    /// Earliest instant at which a cooldown may end.
    pub fn ready_at(&self) -> Option<Instant> {
        match self.state() {
            CameraState::Cooldown { since } => Some(since + COOLDOWN_DELAY),
            _ => None,
        }
    }

    /// Resolve camera and microphone permissions once. No-op after the first call.
    pub async fn initialize(&self) -> CameraState {
        if self.state() != CameraState::Uninitialized {
            return self.state();
        }
        self.resolve_permissions().await
    }

    /// The only way out of `Denied`.
    pub async fn request_permissions(&self) -> CameraState {
        match self.state() {
            CameraState::Uninitialized | CameraState::Denied => self.resolve_permissions().await,
            other => other,
        }
    }

    async fn resolve_permissions(&self) -> CameraState {
        let camera = self.permissions.request(PermissionKind::Camera).await;
        let microphone = self.permissions.request(PermissionKind::Microphone).await;

        {
            let mut inner = self.lock();
            if !(camera.is_granted() && microphone.is_granted()) {
                warn!(
                    "camera permissions refused (camera: {:?}, microphone: {:?})",
                    camera, microphone
                );
                inner.state = CameraState::Denied;
                return inner.state;
            }
            if !inner.focused {
                inner.state = CameraState::Cooldown {
                    since: Instant::now(),
                };
                return inner.state;
            }
            if inner.acquiring {
                return inner.state;
            }
            inner.acquiring = true;
        }

        self.acquire().await
    }

    /// Record one clip of the maximum length.
    pub async fn record(&self) -> Result<RecordedClip, CameraError> {
        self.record_for(MAX_RECORDING).await
    }

    /// Record one clip. `requested` is capped at [`MAX_RECORDING`].
    ///
    /// Rejected with [`CameraError::PermissionDenied`] in `Denied` and with
    /// [`CameraError::NotReady`] in any other state but `Ready`; a rejected
    /// call never reaches the hardware.
    pub async fn record_for(&self, requested: Duration) -> Result<RecordedClip, CameraError> {
        {
            let mut inner = self.lock();
            if inner.state == CameraState::Denied {
                warn!("record() rejected: camera permissions refused");
                return Err(CameraError::PermissionDenied);
            }
            if inner.state != CameraState::Ready || !inner.focused {
                warn!("record() rejected in state {}", inner.state);
                return Err(CameraError::NotReady(inner.state));
            }
            inner.state = CameraState::Recording;
        }

        let cap = requested.min(MAX_RECORDING);
        let mut device = self.device.lock().await;
        let outcome = device.record(cap).await;

        let mut inner = self.lock();
        if inner.state != CameraState::Recording {
            // Torn down (focus loss or reset) while the capture was running.
            device.release();
            inner.state = CameraState::Cooldown {
                since: Instant::now(),
            };
            if let Ok(clip) = &outcome {
                debug!("discarding clip {} from interrupted capture", clip.path.display());
            }
            return Err(CameraError::Hardware(
                "camera was released during recording".into(),
            ));
        }

        match outcome {
            Ok(mut clip) => {
                if clip.duration > cap {
                    warn!(
                        "device reported {:?} for a {:?} capture; capping",
                        clip.duration, cap
                    );
                    clip.duration = cap;
                }
                inner.state = CameraState::Recorded;
                info!("recorded {:?} clip at {}", clip.duration, clip.path.display());
                Ok(clip)
            }
            Err(e) => {
                device.release();
                inner.state = CameraState::Cooldown {
                    since: Instant::now(),
                };
                error!("recording failed: {e}");
                Err(match e {
                    CameraError::Hardware(msg) => CameraError::Hardware(msg),
                    other => CameraError::Hardware(other.to_string()),
                })
            }
        }
    }

    /// Release the hardware and start a cooldown. Safe from any state:
    /// an existing cooldown keeps its deadline, and a session that holds
    /// nothing is left alone.
    pub fn reset(&self) {
        let mut inner = self.lock();
        if inner.state.holds_hardware() {
            info!("camera reset from {}", inner.state);
            self.teardown(&mut inner);
        }
    }

    /// Foreground changes. Losing focus tears the hardware down whatever it was doing.
    pub fn set_focused(&self, focused: bool) {
        let mut inner = self.lock();
        inner.focused = focused;
        if !focused && inner.state.holds_hardware() {
            info!("focus lost in state {}; releasing camera", inner.state);
            self.teardown(&mut inner);
        }
    }

    /// Leave `Cooldown` if the settling delay has passed and the screen is
    /// focused. Never waits on the device: while an interrupted capture still
    /// holds it, the cooldown goes on and restarts when that capture returns.
    pub async fn poll_cooldown(&self) -> CameraState {
        let device = {
            let mut inner = self.lock();
            match inner.state {
                CameraState::Cooldown { since }
                    if inner.focused
                        && !inner.acquiring
                        && Instant::now() >= since + COOLDOWN_DELAY =>
                {
                    match self.device.try_lock() {
                        Ok(device) => {
                            inner.acquiring = true;
                            device
                        }
                        Err(_) => {
                            debug!("capture still holds the camera; cooldown continues");
                            return inner.state;
                        }
                    }
                }
                other => return other,
            }
        };
        self.open_device(device).await
    }

    /// Wait out the current cooldown, then try to become `Ready`.
    pub async fn settle(&self) -> CameraState {
        let deadline = {
            let inner = self.lock();
            match inner.state {
                CameraState::Cooldown { since } if inner.focused => since + COOLDOWN_DELAY,
                other => return other,
            }
        };
        tokio::time::sleep_until(deadline).await;
        self.poll_cooldown().await
    }

    async fn acquire(&self) -> CameraState {
        let device = self.device.lock().await;
        self.open_device(device).await
    }

    async fn open_device(
        &self,
        mut device: MutexGuard<'_, Box<dyn CameraDevice>>,
    ) -> CameraState {
        let opened = device.open().await;
        drop(device);

        let mut inner = self.lock();
        inner.acquiring = false;
        match opened {
            Ok(()) if inner.focused => {
                inner.state = CameraState::Ready;
                info!("camera ready");
            }
            Ok(()) => {
                debug!("focus lost while opening camera");
                self.teardown(&mut inner);
            }
            Err(e) => {
                error!("camera open failed: {e}");
                inner.state = CameraState::Cooldown {
                    since: Instant::now(),
                };
            }
        }
        inner.state
    }

    fn teardown(&self, inner: &mut Inner) {
        inner.state = CameraState::Cooldown {
            since: Instant::now(),
        };
        match self.device.try_lock() {
            Ok(mut device) => device.release(),
            // A capture holds the device; it releases when it returns.
            Err(_) => debug!("camera busy, release deferred"),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::permissions::StaticPermissions;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Scripted device with shared counters.
    #[derive(Clone, Default)]
    pub(crate) struct ScriptedCamera {
        pub opens: Arc<AtomicUsize>,
        pub records: Arc<AtomicUsize>,
        pub releases: Arc<AtomicUsize>,
        pub fail_record: Arc<AtomicBool>,
        pub longest_request: Arc<StdMutex<Duration>>,
        pub reported_duration: Option<Duration>,
        pub clip_path: PathBuf,
    }

    #[async_trait]
    impl CameraDevice for ScriptedCamera {
        async fn open(&mut self) -> Result<(), CameraError> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn record(&mut self, max_duration: Duration) -> Result<RecordedClip, CameraError> {
            self.records.fetch_add(1, Ordering::SeqCst);
            {
                let mut longest = self.longest_request.lock().unwrap();
                *longest = (*longest).max(max_duration);
            }
            tokio::time::sleep(max_duration).await;
            if self.fail_record.load(Ordering::SeqCst) {
                return Err(CameraError::Hardware("device busy".into()));
            }
            Ok(RecordedClip {
                path: self.clip_path.clone(),
                duration: self.reported_duration.unwrap_or(max_duration),
            })
        }

        fn release(&mut self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn session_with(cam: &ScriptedCamera, broker: StaticPermissions) -> CameraSession {
        CameraSession::new(Box::new(cam.clone()), Arc::new(broker))
    }

    #[tokio::test(start_paused = true)]
    async fn initialize_with_permissions_opens_preview() {
        let cam = ScriptedCamera::default();
        let session = session_with(&cam, StaticPermissions::granting_all());

        assert_eq!(session.state(), CameraState::Uninitialized);
        assert!(!session.preview_visible());

        assert_eq!(session.initialize().await, CameraState::Ready);
        assert!(session.preview_visible());
        assert!(session.can_record());
        assert_eq!(cam.opens.load(Ordering::SeqCst), 1);

        // Second initialize does not reallocate.
        session.initialize().await;
        assert_eq!(cam.opens.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn refused_microphone_means_denied_until_re_requested() {
        let cam = ScriptedCamera::default();
        let broker = Arc::new(StaticPermissions::denying([PermissionKind::Microphone]));
        let session = CameraSession::new(Box::new(cam.clone()), broker.clone());

        assert_eq!(session.initialize().await, CameraState::Denied);
        assert!(matches!(
            session.record().await,
            Err(CameraError::PermissionDenied)
        ));
        assert_eq!(cam.opens.load(Ordering::SeqCst), 0);

        // Settling and resetting do not leave Denied.
        session.reset();
        assert_eq!(session.settle().await, CameraState::Denied);

        broker.grant(PermissionKind::Microphone);
        assert_eq!(session.request_permissions().await, CameraState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn successful_recording_enters_recorded_substate() {
        let cam = ScriptedCamera {
            clip_path: PathBuf::from("/cache/clip.mp4"),
            ..Default::default()
        };
        let session = session_with(&cam, StaticPermissions::granting_all());
        session.initialize().await;

        let clip = session.record().await.unwrap();
        assert_eq!(clip.path, PathBuf::from("/cache/clip.mp4"));
        assert!(session.has_recorded());
        assert!(!session.preview_visible());
        assert!(!session.can_record());
        assert!(matches!(
            session.record().await,
            Err(CameraError::NotReady(CameraState::Recorded))
        ));
        assert_eq!(cam.records.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn recording_length_is_capped() {
        let cam = ScriptedCamera::default();
        let session = session_with(&cam, StaticPermissions::granting_all());
        session.initialize().await;

        let clip = session.record_for(Duration::from_secs(30)).await.unwrap();
        assert!(clip.duration <= MAX_RECORDING);
        assert_eq!(*cam.longest_request.lock().unwrap(), MAX_RECORDING);
    }

    #[tokio::test(start_paused = true)]
    async fn overlong_device_report_is_capped() {
        let cam = ScriptedCamera {
            reported_duration: Some(Duration::from_secs(9)),
            ..Default::default()
        };
        let session = session_with(&cam, StaticPermissions::granting_all());
        session.initialize().await;

        let clip = session.record_for(Duration::from_secs(1)).await.unwrap();
        assert_eq!(clip.duration, Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn record_while_recording_is_rejected() {
        let cam = ScriptedCamera::default();
        let session = session_with(&cam, StaticPermissions::granting_all());
        session.initialize().await;

        let (first, second) = tokio::join!(session.record(), session.record());

        assert!(first.is_ok());
        assert!(matches!(
            second,
            Err(CameraError::NotReady(CameraState::Recording))
        ));
        assert_eq!(cam.records.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn hardware_failure_forces_cooldown() {
        let cam = ScriptedCamera::default();
        cam.fail_record.store(true, Ordering::SeqCst);
        let session = session_with(&cam, StaticPermissions::granting_all());
        session.initialize().await;

        let err = session.record().await.unwrap_err();
        assert!(matches!(err, CameraError::Hardware(_)));
        assert!(session.state().is_cooldown());
        assert!(!session.preview_visible());
        assert_eq!(cam.releases.load(Ordering::SeqCst), 1);

        cam.fail_record.store(false, Ordering::SeqCst);
        assert_eq!(session.settle().await, CameraState::Ready);
        assert!(session.record().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn cooldown_holds_for_the_settling_delay() {
        let cam = ScriptedCamera::default();
        let session = session_with(&cam, StaticPermissions::granting_all());
        session.initialize().await;
        session.record().await.unwrap();

        session.reset();
        assert!(session.state().is_cooldown());

        tokio::time::advance(COOLDOWN_DELAY - Duration::from_millis(1)).await;
        assert!(session.poll_cooldown().await.is_cooldown());
        assert!(!session.preview_visible());
        assert_eq!(cam.opens.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(session.poll_cooldown().await, CameraState::Ready);
        assert!(session.preview_visible());
        assert_eq!(cam.opens.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_is_idempotent() {
        let cam = ScriptedCamera::default();
        let session = session_with(&cam, StaticPermissions::granting_all());

        session.reset();
        assert_eq!(session.state(), CameraState::Uninitialized);

        session.initialize().await;
        session.reset();
        let first_deadline = session.ready_at();
        tokio::time::advance(Duration::from_millis(50)).await;
        session.reset();
        assert_eq!(session.ready_at(), first_deadline);
        assert_eq!(cam.releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn focus_loss_keeps_camera_released_until_refocused() {
        let cam = ScriptedCamera::default();
        let session = session_with(&cam, StaticPermissions::granting_all());
        session.initialize().await;

        session.set_focused(false);
        assert!(session.state().is_cooldown());
        assert_eq!(cam.releases.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(session.settle().await.is_cooldown());
        assert!(session.poll_cooldown().await.is_cooldown());

        session.set_focused(true);
        assert_eq!(session.poll_cooldown().await, CameraState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_during_capture_discards_the_clip() {
        let cam = ScriptedCamera::default();
        let session = session_with(&cam, StaticPermissions::granting_all());
        session.initialize().await;

        let (result, ()) = tokio::join!(session.record(), async {
            tokio::task::yield_now().await;
            session.reset();
        });

        assert!(matches!(result, Err(CameraError::Hardware(_))));
        assert!(session.state().is_cooldown());
        assert_eq!(cam.releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cooldown_restarts_when_interrupted_capture_returns() {
        let cam = ScriptedCamera::default();
        let session = session_with(&cam, StaticPermissions::granting_all());
        session.initialize().await;

        let (recorded, polled) = tokio::join!(session.record(), async {
            tokio::task::yield_now().await;
            session.reset();
            tokio::time::advance(COOLDOWN_DELAY).await;
            session.poll_cooldown().await
        });

        // The poll neither waited for the capture nor reopened the device.
        assert!(polled.is_cooldown());
        assert!(matches!(recorded, Err(CameraError::Hardware(_))));
        assert_eq!(cam.releases.load(Ordering::SeqCst), 1);
        assert_eq!(cam.opens.load(Ordering::SeqCst), 1);

        // The hold-off counts from the release, not from the reset.
        let released_at = Instant::now();
        assert_eq!(session.ready_at(), Some(released_at + COOLDOWN_DELAY));
        assert!(session.poll_cooldown().await.is_cooldown());
        assert!(!session.preview_visible());

        tokio::time::advance(COOLDOWN_DELAY).await;
        assert_eq!(session.poll_cooldown().await, CameraState::Ready);
        assert_eq!(cam.opens.load(Ordering::SeqCst), 2);
    }
}
