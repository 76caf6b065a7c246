use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// One-time password handed to a participant at registration.
pub fn generate_temp_password(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
