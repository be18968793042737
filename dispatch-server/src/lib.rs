//! Station dispatch optimization server.
//!
//! Computes minimally-delayed movement plans for trains sharing one
//! station's platforms and track segments, and serves the results to a
//! dispatcher dashboard.

pub mod dashboard;
pub mod domain;
pub mod solver;
pub mod topology;
pub mod web;
