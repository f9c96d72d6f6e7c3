pub mod record;
pub mod schema;
pub mod utils;

// Re-export handler functions for use in routing
pub use record::delete as record_delete;
pub use record::get as record_get;
pub use record::options as record_options;
pub use record::patch as record_patch;
pub use record::put as record_put;

pub use schema::get as schema_get;
pub use schema::options as schema_options;
pub use schema::post as schema_post;
