//! Core library for the lanzamientos-export command line application.
//!
//! The library turns a workbook of vendor ledger sheets into per-seller JSON
//! and CSV exports plus a manifest. Sheet recognition and row parsing live in
//! [`lanzamientos::export::ledger`], file readers and writers under
//! [`lanzamientos::export::io`], the orchestration in
//! [`lanzamientos::export::process`], and the optional copy to remote storage
//! in [`lanzamientos::export::upload`].

pub mod lanzamientos;

pub use lanzamientos::export::{
    ExportError, Result, error, io, ledger, model, process, upload, version,
};
