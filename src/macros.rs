#[macro_export]
macro_rules! err_log {
    ($e:expr) => {
        if let Err(err) = $e {
            log::warn!("[{}:{}] {:?}", line!(), column!(), err);
        }
    };
}

/// Reply to the invoking user only; evaluates to the pending send.
#[macro_export]
macro_rules! ephemeral {
    ($ctx:expr, $($arg:tt)*) => {
        $ctx.send(
            ::poise::CreateReply::default()
                .content(::std::format!($($arg)*))
                .ephemeral(true),
        )
    };
}
