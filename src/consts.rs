//! Shared numeric constants for the overlay engine.

// ── Handles ─────────────────────────────────────────────────────

/// Default handle edge length in world units at zoom 1.
pub const DEFAULT_HANDLE_SIZE: f64 = 5.0;

/// Number of resize handles around a selected overlay.
pub const HANDLE_COUNT: usize = 8;

/// Minimum overlay edge expressed in handle widths, so handles never overlap.
pub const MIN_SIZE_IN_HANDLES: f64 = 2.0;

// ── Timing ──────────────────────────────────────────────────────

/// Default quiet period before a window-resize burst is acted on, in milliseconds.
pub const DEFAULT_RESIZE_QUIET_MS: u64 = 100;
