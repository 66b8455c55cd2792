pub mod debounce;
pub mod executor;
pub mod refilter;
pub mod session;
pub mod source;
pub mod sources;
pub mod state;

pub use executor::QueryExecutor;
pub use session::{SearchCommand, SearchEvent, SearchSession};
pub use source::{RemoteDataSource, SearchPage, SearchRequest, SourceError};
pub use sources::{CreatorSearchSource, InfluencerTableSource};
pub use state::{EmptyState, SearchState, SearchView};
