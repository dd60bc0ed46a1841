//! `lumen-device` – the coalescing and consistency layer in front of a
//! slow HTTP light device.
//!
//! Many independent callers read and write pieces of one composite color
//! state (hue, saturation, brightness, power) at unpredictable rates; the
//! device only answers one slow request at a time. This crate makes the
//! two meet:
//!
//! - [`state`] – [`ColorState`][state::ColorState] /
//!   [`ColorCache`][state::ColorCache]: the last known value of every
//!   channel plus the wire payload parse/render rules.
//! - [`read`] – [`ReadCoalescer`][read::ReadCoalescer]: serves reads from
//!   a short-lived cache, keeps at most one fetch in flight, and fans a
//!   single device response out to every caller that asked during the
//!   same window.
//! - [`write`] – [`WriteDebouncer`][write::WriteDebouncer]: merges a burst
//!   of per-channel writes into one composite flush per debounce window
//!   and acknowledges every contributor once it lands.
//! - [`light`] – [`Light`][light::Light]: the per-device facade routing
//!   `get_channel` / `set_channel` into the two coalescers.
//! - [`temperature`] – [`TemperatureReader`][temperature::TemperatureReader]:
//!   plain JSON read of an attached temperature sensor.
//!
//! Reads and writes are independent directions; one fetch and one flush
//! may be in flight at the same time, and both go through the shared
//! [`ColorCache`][state::ColorCache].

pub mod light;
pub mod read;
pub mod state;
pub mod temperature;
pub mod write;

pub use light::Light;
pub use read::ReadCoalescer;
pub use state::{ColorCache, ColorState};
pub use temperature::TemperatureReader;
pub use write::WriteDebouncer;
