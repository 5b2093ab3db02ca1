pub(crate) mod domain;
pub(crate) mod genome;
pub(crate) mod group;
