#![forbid(unsafe_code)]

//! SwapGrid demo: a terminal company selector whose tiles reorder by dragging
//! their `::` grip.

pub mod app;
pub mod canvas;
pub mod cli;
pub mod company;
pub mod i18n;
pub mod request;
