pub mod cloud_stt;
pub mod context;
