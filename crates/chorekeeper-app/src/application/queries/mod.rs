mod progress_queries;

pub use progress_queries::ProgressQueries;
