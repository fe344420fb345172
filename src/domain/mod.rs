// ============================================================
// Layer 1 — Domain Layer
// ============================================================
// Plain Rust types and traits that describe the layers without
// touching a tensor:
//
//   error.rs   — LayerError, the one error type of the crate
//   mode.rs    — ExecutionMode and the PositionMode tagged enum
//   shape.rs   — static output-shape inference
//   naming.rs  — automatic layer and parameter names
//   traits.rs  — the Layer / LayerConfig contract
//
// Rules for this layer:
//   - NO burn types
//   - NO file I/O
//
// Everything here is unit-testable without a backend.

pub mod error;

pub mod mode;

pub mod naming;

pub mod shape;

pub mod traits;
