//! Live capture devices and blocking capture sessions

use bytes::Bytes;
use netcount_core::{Error, Frame, Result};
use netcount_packet::LinkType;
use pcap::{Active, Capture, Device};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, error, info, warn};

use crate::interface::InterfaceInfo;
use crate::stats::{CaptureSummary, KernelStats, StopReason};

/// Default snapshot length (maximum bytes per packet)
const DEFAULT_SNAPLEN: i32 = 65535;

/// Default read timeout (milliseconds). Bounds how far a session can
/// overrun its duration on a quiet link.
const DEFAULT_TIMEOUT_MS: i32 = 100;

/// Configuration for packet capture
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Maximum bytes to capture per packet
    pub snaplen: i32,
    /// Read timeout in milliseconds
    pub timeout_ms: i32,
    /// Enable promiscuous mode
    pub promiscuous: bool,
    /// Buffer size (0 = default)
    pub buffer_size: i32,
    /// Enable immediate mode (deliver packets immediately)
    pub immediate_mode: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            snaplen: DEFAULT_SNAPLEN,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            promiscuous: true,
            buffer_size: 0,
            immediate_mode: true,
        }
    }
}

/// Cloneable signal that ends a running session from another thread
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the session to stop after the current read
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Something that yields captured frames one at a time
pub trait FrameSource {
    /// Next frame, or `None` when the read timed out with nothing captured
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    /// Kernel counters for the source, if it keeps any
    fn kernel_stats(&mut self) -> Option<KernelStats> {
        None
    }
}

impl FrameSource for Capture<Active> {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        match self.next_packet() {
            Ok(packet) => {
                let ts = packet.header.ts;
                let timestamp = capture_time(i64::from(ts.tv_sec), i64::from(ts.tv_usec));
                Ok(Some(Frame::truncated(
                    timestamp,
                    Bytes::copy_from_slice(packet.data),
                    packet.header.len as usize,
                )))
            }
            Err(pcap::Error::TimeoutExpired) => Ok(None),
            Err(e) => Err(Error::capture(format!("Failed to read packet: {}", e))),
        }
    }

    fn kernel_stats(&mut self) -> Option<KernelStats> {
        match self.stats() {
            Ok(stats) => Some(stats.into()),
            Err(e) => {
                debug!("Kernel statistics unavailable: {}", e);
                None
            }
        }
    }
}

/// Convert a pcap header timestamp. Values before the epoch or out of range
/// fall back to the current time.
fn capture_time(secs: i64, micros: i64) -> SystemTime {
    match (u64::try_from(secs), u32::try_from(micros)) {
        (Ok(secs), Ok(micros)) if micros < 1_000_000 => UNIX_EPOCH
            .checked_add(Duration::new(secs, micros * 1000))
            .unwrap_or_else(SystemTime::now),
        _ => SystemTime::now(),
    }
}

/// Pull frames from `source` and hand them to `on_frame` until the budget
/// elapses, the callback returns `true`, or `stop` is triggered.
///
/// The budget is checked between reads, so a session can overrun it by at
/// most one read timeout.
pub fn run_session<S, F>(
    source: &mut S,
    budget: Duration,
    stop: &StopHandle,
    mut on_frame: F,
) -> Result<CaptureSummary>
where
    S: FrameSource + ?Sized,
    F: FnMut(Frame) -> bool,
{
    let started = Instant::now();
    let mut summary = CaptureSummary::default();

    let reason = loop {
        if stop.is_stopped() {
            break StopReason::Stopped;
        }
        if started.elapsed() >= budget {
            break StopReason::BudgetElapsed;
        }

        match source.next_frame() {
            Ok(Some(frame)) => {
                summary.record_frame(frame.len());
                if on_frame(frame) {
                    break StopReason::Requested;
                }
            }
            Ok(None) => continue,
            Err(e) => {
                error!("Capture aborted after {} frames: {}", summary.frames, e);
                return Err(e);
            }
        }
    };

    summary.elapsed = started.elapsed();
    summary.reason = reason;
    summary.kernel = source.kernel_stats();

    debug!(
        "Session ended ({}): {} frames, {} bytes",
        reason, summary.frames, summary.bytes
    );
    Ok(summary)
}

/// A capture device bound to one interface
pub struct LiveDevice {
    info: InterfaceInfo,
    config: CaptureConfig,
    capture: Option<Capture<Active>>,
}

impl LiveDevice {
    /// Create a closed device for the interface
    pub fn new(info: InterfaceInfo) -> Self {
        Self::with_config(info, CaptureConfig::default())
    }

    /// Create a closed device with custom configuration
    pub fn with_config(info: InterfaceInfo, config: CaptureConfig) -> Self {
        Self {
            info,
            config,
            capture: None,
        }
    }

    /// Interface information
    pub fn info(&self) -> &InterfaceInfo {
        &self.info
    }

    /// Capture configuration
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Check if the device is open
    pub fn is_open(&self) -> bool {
        self.capture.is_some()
    }

    /// Open the pcap handle. Opening an open device is a no-op.
    pub fn open(&mut self) -> Result<()> {
        if self.capture.is_some() {
            return Ok(());
        }

        let name = self.info.name.as_str();
        debug!("Opening pcap handle on {}", name);

        let device = Device::from(name);
        let mut capture = Capture::from_device(device)
            .map_err(|e| Error::device_open(name, e))?
            .promisc(self.config.promiscuous)
            .snaplen(self.config.snaplen)
            .timeout(self.config.timeout_ms)
            .immediate_mode(self.config.immediate_mode);

        if self.config.buffer_size > 0 {
            capture = capture.buffer_size(self.config.buffer_size);
        }

        let capture = capture.open().map_err(|e| Error::device_open(name, e))?;

        info!(
            "Opened {} (link type {})",
            name,
            LinkType::from_dlt(capture.get_datalink().0)
        );
        self.capture = Some(capture);
        Ok(())
    }

    /// Close the pcap handle
    pub fn close(&mut self) {
        if self.capture.take().is_some() {
            debug!("Closed {}", self.info.name);
        }
    }

    /// Link type of the open device
    pub fn link_type(&self) -> Result<LinkType> {
        self.capture
            .as_ref()
            .map(|capture| LinkType::from_dlt(capture.get_datalink().0))
            .ok_or_else(|| Error::capture("Device not open"))
    }

    /// Capture on the calling thread for up to `budget`.
    ///
    /// Each frame is handed to `on_frame` in arrival order; returning `true`
    /// ends the session early.
    pub fn capture_blocking<F>(
        &mut self,
        budget: Duration,
        stop: &StopHandle,
        on_frame: F,
    ) -> Result<CaptureSummary>
    where
        F: FnMut(Frame) -> bool,
    {
        let name = self.info.name.clone();
        let capture = self
            .capture
            .as_mut()
            .ok_or_else(|| Error::capture(format!("Device '{}' not open", name)))?;

        info!("Capturing on {} for {:?}", name, budget);
        let summary = run_session(capture, budget, stop, on_frame)?;

        if let Some(kernel) = summary.kernel {
            if kernel.dropped > 0 {
                warn!("Kernel dropped {} packets on {}", kernel.dropped, name);
            }
        }
        Ok(summary)
    }
}

impl Drop for LiveDevice {
    fn drop(&mut self) {
        self.close();
    }
}
