// ============================================================
// Layer 3 — Infrastructure Layer
// ============================================================
// File-system concerns kept out of the layer code:
//
//   layer_store.rs — saves layer configs as JSON envelopes and
//                    feed-forward parameters with burn's
//                    CompactRecorder, and restores both.
//
// Errors here are reported with anyhow plus context, since the
// caller usually just wants to know which file went wrong.
//
// Reference: Burn Book §5 (Checkpointing)
//            Rust Book §9 (Error Handling with anyhow)

/// Layer config and parameter persistence
pub mod layer_store;
