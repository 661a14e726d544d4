/// Immediate-mode rendering layer: consumes chart-ready outputs from the
/// coordinator and turns selection widgets into events. Never reaches into
/// the pipeline beyond the coordinator API.
pub mod panels;
pub mod plot;
