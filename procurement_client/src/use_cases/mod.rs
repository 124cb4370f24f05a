// Use cases: CSRF token lifecycle, request/response pipeline steps and
// error normalization. Everything here depends only on domain ports.

pub mod csrf;
pub mod normalize_error;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;
