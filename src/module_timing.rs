use embassy_time::Duration;

/// Interval between two reads of the serial channel while a command is pending
pub fn poll_interval() -> Duration {
    Duration::from_millis(1)
}

/// Default response timeout for a plain AT command
pub fn command_timeout() -> Duration {
    Duration::from_millis(1000)
}

/// Backoff step of the acknowledgement retry loop, multiplied by the attempt
/// index
pub fn ack_backoff_step() -> Duration {
    Duration::from_millis(100)
}

/// Pause between two `+CREG?` polls while waiting for network registration
pub fn registration_poll_interval() -> Duration {
    Duration::from_millis(500)
}

/// Pause between two `+CNACT?` polls while waiting for the PDP context
pub fn context_poll_interval() -> Duration {
    Duration::from_millis(1000)
}

/// Number of `+CNACT?` polls before the activation is re-sent
pub const CONTEXT_REACTIVATION_POLLS: u8 = 8;

/// Time for the modem to switch into payload receive mode after a `+SMPUB`,
/// `+HTTPDATA` or `+CMGS` header
pub fn payload_prompt_wait() -> Duration {
    Duration::from_millis(100)
}

/// Timeout of the first publish payload transfer
pub fn publish_payload_timeout() -> Duration {
    Duration::from_millis(3000)
}

/// Timeout of a publish payload transfer resubmitted after a repair
pub fn publish_retry_payload_timeout() -> Duration {
    Duration::from_millis(5000)
}

/// Number of check-and-repair cycles before a publish is abandoned
pub const PUBLISH_REPAIR_ATTEMPTS: u8 = 6;

/// Time for the rest of a push frame to arrive after its marker byte
pub fn push_frame_wait() -> Duration {
    Duration::from_millis(50)
}

/// Timeout of the raw HTTP body transfer
pub fn http_data_timeout() -> Duration {
    Duration::from_millis(1000)
}

/// Pause between two `+CGNSINF` polls while waiting for a GNSS fix
pub fn gnss_poll_interval() -> Duration {
    Duration::from_millis(500)
}
