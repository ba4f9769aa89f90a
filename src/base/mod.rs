pub mod amount;
pub mod nonce;
pub mod project_id;
pub mod time_window;
