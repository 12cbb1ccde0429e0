pub(crate) mod weight_message;
