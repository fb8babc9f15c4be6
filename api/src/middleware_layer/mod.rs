pub mod error_envelope;
