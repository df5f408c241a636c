//! Support-image overlays for a pannable, zoomable diagram viewport.
//!
//! The crate owns the interaction and geometry side of image overlays that
//! sit on top of a host viewport: the overlay entities and their ordering,
//! the selection/drag/resize gesture state machine, the constrained-resize
//! arithmetic, and the screen-to-world coordinate bridge. The host supplies
//! pan/zoom state and pointer events through the [`viewport::Viewport`] trait
//! and consumes [`event::Notification`]s to know when to redraw.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::SupportImages`] façade |
//! | [`collection`] | Ordered overlay list, selection and the eight handles |
//! | [`overlay`] | A single positioned image and its descriptor |
//! | [`controller`] | Pointer gesture state machine |
//! | [`resize`] | Constrained-resize arithmetic |
//! | [`hit`] | Hit-testing against handles and overlays |
//! | [`handle`] | Resize handle identifiers and layout |
//! | [`input`] | Pointer events, modifiers and gesture state |
//! | [`camera`] | Pan/zoom camera and the screen-to-world bridge |
//! | [`viewport`] | Host viewport contract and exclusive interaction mode |
//! | [`geom`] | `Point` and `Rect` |
//! | [`document`] | Persisted document shape |
//! | [`event`] | Notifications emitted to the host |
//! | [`cache`] | URL-keyed image resource cache |
//! | [`debounce`] | Quiet-period coalescing for window resize bursts |
//! | [`render`] | Drawing contract for a 2D painter |
//! | [`config`] | Tunables with env overrides |
//! | [`consts`] | Shared numeric constants |

pub mod cache;
pub mod camera;
pub mod collection;
pub mod config;
pub mod consts;
pub mod controller;
pub mod debounce;
pub mod document;
pub mod engine;
pub mod event;
pub mod geom;
pub mod handle;
pub mod hit;
pub mod input;
pub mod overlay;
pub mod render;
pub mod resize;
pub mod viewport;
