mod naming;
mod pipeline;
mod refs;
mod support;
