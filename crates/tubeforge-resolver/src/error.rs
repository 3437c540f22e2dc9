use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolverError {
    /// No extraction strategy matched the fetched channel page, or the page
    /// could not be fetched at all. A dead end for this input — there is no
    /// point guessing.
    #[error("could not resolve channel input: {input}")]
    NotResolvable { input: String },

    /// Every handle in a batch failed to resolve.
    #[error("none of the {attempted} handles could be resolved")]
    BatchUnresolvable { attempted: usize },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
