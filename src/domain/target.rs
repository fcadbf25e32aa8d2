use bytes::Bytes;
use url::Url;

/// One payload/URL pair. Immutable after load and shared by every plan that
/// posts it.
#[derive(Debug)]
pub struct Target {
    url: Url,
    payload: Bytes,
}

impl Target {
    #[must_use]
    pub const fn new(url: Url, payload: Bytes) -> Self {
        Self { url, payload }
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns a handle to the payload. The clone shares the loaded buffer.
    #[must_use]
    pub fn payload(&self) -> Bytes {
        self.payload.clone()
    }

    #[must_use]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
}
