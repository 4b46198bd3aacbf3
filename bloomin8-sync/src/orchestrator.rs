//! The sync run, start to finish.
//!
//! A linear state machine:
//! `Configure -> ProbeLiveness -> [Wake] -> ListGalleries ->
//! LocateTargetGallery -> ListRemoteImages -> ScanLocalFolder -> BuildPlan ->
//! [Confirm] -> ExecutePlan -> SleepDevice -> Report`.
//!
//! Fatal errors (bad source, device unreachable while listing) end the run
//! with exit code 1 before any change is made. Once the source checks out
//! the device is always sent back to sleep, whatever happened after.

use crate::errors::SyncError;
use crate::reconcile::{self, orphans, RemoteImage, SyncGateway, SyncPlan, SyncResult};
use crate::report;
use async_trait::async_trait;
use bloomin8_client::ble::WakeOutcome;
use bloomin8_client::fs::{scan_images, validate_source};
use bloomin8_client::models::{GalleryImage, GallerySummary};
use bloomin8_client::{ClientError, Device, StatusPolicy};
use std::io::Write as _;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configure,
    ProbeLiveness,
    Wake,
    ListGalleries,
    LocateTargetGallery,
    ListRemoteImages,
    ScanLocalFolder,
    BuildPlan,
    Confirm,
    ExecutePlan,
    SleepDevice,
    Report,
}

/// Device operations the run needs beyond the reconciliation gateway.
#[async_trait]
pub trait DeviceOps: SyncGateway {
    async fn is_awake(&self, timeout: Duration) -> bool;

    async fn wake(&mut self, scan_timeout: Duration) -> WakeOutcome;

    async fn list_galleries(&self) -> Result<Vec<GallerySummary>, ClientError>;

    async fn gallery_count(&self, name: &str) -> Result<u64, ClientError>;

    async fn gallery_images(&self, name: &str) -> Result<Vec<GalleryImage>, ClientError>;

    async fn sleep(&self) -> Result<(), ClientError>;
}

#[async_trait]
impl SyncGateway for Device {
    async fn delete_image(&self, filename: &str, gallery: &str) -> Result<(), ClientError> {
        SyncGateway::delete_image(self.client(), filename, gallery).await
    }

    async fn upload_image(&self, image: &bloomin8_client::fs::LocalImage, gallery: &str) -> Result<u64, ClientError> {
        SyncGateway::upload_image(self.client(), image, gallery).await
    }
}

#[async_trait]
impl DeviceOps for Device {
    async fn is_awake(&self, timeout: Duration) -> bool {
        Device::is_awake(self, timeout).await
    }

    async fn wake(&mut self, scan_timeout: Duration) -> WakeOutcome {
        Device::wake(self, scan_timeout).await
    }

    async fn list_galleries(&self) -> Result<Vec<GallerySummary>, ClientError> {
        let galleries = self.client_with(StatusPolicy::Raise).list_galleries().await?;
        Ok(galleries.unwrap_or_default())
    }

    async fn gallery_count(&self, name: &str) -> Result<u64, ClientError> {
        self.client_with(StatusPolicy::Raise).gallery_size(name).await
    }

    async fn gallery_images(&self, name: &str) -> Result<Vec<GalleryImage>, ClientError> {
        self.client_with(StatusPolicy::Raise).gallery_images(name).await
    }

    async fn sleep(&self) -> Result<(), ClientError> {
        self.client_with(StatusPolicy::Raise).sleep().await.map(|_| ())
    }
}

/// Yes/no question to the operator.
#[async_trait]
pub trait Confirm: Send {
    /// `true` only for an explicit yes.
    async fn confirm(&mut self, prompt: &str) -> bool;
}

/// Reads the answer from stdin. EOF and Ctrl-C count as "no".
pub struct StdinConfirm;

/// Case-insensitive `y` or `yes`, surrounding whitespace ignored.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl Confirm for StdinConfirm {
    async fn confirm(&mut self, prompt: &str) -> bool {
        print!("{}", prompt);
        if let Err(e) = std::io::stdout().flush() {
            debug!("stdout flush failed: {}", e);
        }

        let mut answer = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        let read = tokio::select! {
            read = reader.read_line(&mut answer) => Some(read),
            _ = tokio::signal::ctrl_c() => None,
        };
        match read {
            Some(Ok(0)) | None => {
                println!();
                false
            }
            Some(Ok(_)) => is_affirmative(&answer),
            Some(Err(e)) => {
                debug!("Failed to read answer: {}", e);
                false
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub source: PathBuf,
    pub gallery: String,
    pub wake: bool,
    pub force: bool,
    pub mirror: bool,
    pub probe_timeout: Duration,
    pub scan_timeout: Duration,
}

#[derive(Debug)]
pub enum RunOutcome {
    /// The plan ran; failures are counted inside.
    Synced(SyncResult),
    NothingToDo,
    Cancelled,
    Failed(SyncError),
}

/// What happened during a run, and the stages it went through.
#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub stages: Vec<Stage>,
}

impl RunReport {
    /// 0 for success, nothing to do or cancelled; 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match &self.outcome {
            RunOutcome::Synced(result) if result.has_failures() => 1,
            RunOutcome::Synced(_) | RunOutcome::NothingToDo | RunOutcome::Cancelled => 0,
            RunOutcome::Failed(_) => 1,
        }
    }
}

struct Run {
    stages: Vec<Stage>,
}

impl Run {
    fn enter(&mut self, stage: Stage) {
        debug!(?stage, "Entering stage");
        self.stages.push(stage);
    }

    fn finish(mut self, outcome: RunOutcome) -> RunReport {
        self.enter(Stage::Report);
        if let RunOutcome::Failed(e) = &outcome {
            error!("Error: {}", e);
        }
        RunReport {
            outcome,
            stages: self.stages,
        }
    }
}

fn log_block(text: &str) {
    for line in text.lines() {
        info!("{}", line);
    }
}

/// Run one synchronization pass.
pub async fn run<D, C>(device: &mut D, confirm: &mut C, options: &SyncOptions) -> RunReport
where
    D: DeviceOps + ?Sized,
    C: Confirm + ?Sized,
{
    let mut run = Run { stages: Vec::new() };

    run.enter(Stage::Configure);
    if let Err(e) = validate_source(&options.source) {
        return run.finish(RunOutcome::Failed(SyncError::Source(e)));
    }
    info!("Source folder: {}", options.source.display());

    let outcome = match sync_pass(&mut run, device, confirm, options).await {
        Ok(outcome) => outcome,
        Err(e) => RunOutcome::Failed(e),
    };

    run.enter(Stage::SleepDevice);
    info!("Putting device to sleep...");
    match device.sleep().await {
        Ok(()) => debug!("-> Device is now sleeping."),
        Err(e) => warn!("Failed to put device to sleep: {}", e),
    }

    run.finish(outcome)
}

/// Everything between the source check and putting the device to sleep.
async fn sync_pass<D, C>(
    run: &mut Run,
    device: &mut D,
    confirm: &mut C,
    options: &SyncOptions,
) -> Result<RunOutcome, SyncError>
where
    D: DeviceOps + ?Sized,
    C: Confirm + ?Sized,
{
    if options.wake {
        run.enter(Stage::ProbeLiveness);
        info!("Checking if device is awake...");
        if device.is_awake(options.probe_timeout).await {
            info!("-> Device is already awake, skipping Bluetooth wake-up.");
        } else {
            run.enter(Stage::Wake);
            info!("-> Device appears to be asleep, attempting Bluetooth wake-up...");
            let outcome = device.wake(options.scan_timeout).await;
            if let Some(address) = &outcome.discovered_address {
                info!("-> BLE Address: {}", address);
            }
            if !outcome.success {
                warn!(
                    "-> Bluetooth wake-up did not succeed ({}), trying Wi-Fi anyway",
                    outcome.reason.as_deref().unwrap_or("unknown reason")
                );
            }
        }
    }

    run.enter(Stage::ListGalleries);
    info!("Retrieving galleries from device...");
    let galleries = device.list_galleries().await.map_err(SyncError::Galleries)?;
    info!("Found {} gallery(ies) on device:", galleries.len());
    for gallery in &galleries {
        let is_target = gallery.name == options.gallery;
        let count = match device.gallery_count(&gallery.name).await {
            Ok(count) => Some(count),
            Err(e) => {
                debug!("  - {} (could not retrieve image count: {})", gallery.name, e);
                None
            }
        };
        info!("{}", report::gallery_line(&gallery.name, count, is_target));
    }

    run.enter(Stage::LocateTargetGallery);
    let gallery_exists = galleries.iter().any(|gallery| gallery.name == options.gallery);

    let remote = if gallery_exists {
        info!("Target gallery '{}' found on device.", options.gallery);
        run.enter(Stage::ListRemoteImages);
        let images = device
            .gallery_images(&options.gallery)
            .await
            .map_err(SyncError::RemoteImages)?;
        debug!("Retrieved {} images from target gallery", images.len());
        RemoteImage::from_gallery(images)
    } else {
        info!("Target gallery '{}' not found on device.", options.gallery);
        Vec::new()
    };

    run.enter(Stage::ScanLocalFolder);
    info!("Scanning source folder: {}", options.source.display());
    let local = scan_images(&options.source).map_err(SyncError::Scan)?;
    info!("-> Found {} image file(s) in source folder", local.len());

    run.enter(Stage::BuildPlan);
    let plan: SyncPlan = reconcile::plan(&local, &remote, options.mirror);
    log_block(&report::overview(
        &options.gallery,
        gallery_exists,
        &plan,
        &orphans(&local, &remote),
    ));

    if plan.is_empty() {
        info!("No changes to synchronize. Everything is up to date.");
        return Ok(RunOutcome::NothingToDo);
    }
    if !proceed(run, confirm, options.force).await {
        info!("Synchronization cancelled.");
        return Ok(RunOutcome::Cancelled);
    }

    run.enter(Stage::ExecutePlan);
    info!("STARTING SYNCHRONIZATION");
    let result = reconcile::execute(&plan, &*device, &options.gallery).await;
    log_block(&report::summary(&result));
    Ok(RunOutcome::Synced(result))
}

async fn proceed<C: Confirm + ?Sized>(run: &mut Run, confirm: &mut C, force: bool) -> bool {
    if force {
        info!("--force flag set, proceeding without confirmation...");
        return true;
    }
    run.enter(Stage::Confirm);
    confirm.confirm("\nProceed with synchronization? [y/N]: ").await
}
