/// Unwraps a `Result`, panicking with `msg` and the error on failure.
#[macro_export]
macro_rules! expect {
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(t) => t,
            Err(why) => {
                panic!("{}: {}", $msg, why);
            }
        }
    };
}

#[macro_export]
macro_rules! tsuki_trace {
    ($($arg:tt)+) => {
        $crate::log::trace!($($arg)+)
    };
}

#[macro_export]
macro_rules! tsuki_debug {
    ($($arg:tt)+) => {
        $crate::log::debug!($($arg)+)
    };
}

#[macro_export]
macro_rules! tsuki_info {
    ($($arg:tt)+) => {
        $crate::log::info!($($arg)+)
    };
}

#[macro_export]
macro_rules! tsuki_warn {
    ($($arg:tt)+) => {
        $crate::log::warn!($($arg)+)
    };
}

#[macro_export]
macro_rules! tsuki_error {
    ($($arg:tt)+) => {
        $crate::log::error!($($arg)+)
    };
}
