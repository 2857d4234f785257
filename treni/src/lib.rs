//! Real-time Italian train information from ViaggiaTreno.
//!
//! Station boards with per-train real-time state, stop-by-stop journey
//! progress, network statistics and fuzzy station search, shared by a
//! terminal client and an HTTP wrapper.

pub mod cache;
pub mod domain;
pub mod presentation;
pub mod render;
pub mod stations;
pub mod timetable;
pub mod viaggiatreno;
pub mod web;
