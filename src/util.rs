const SMTP_USER: &str = "SMTP_USER";

pub fn get_smtp_user() -> Option<String> {
    let user_from_env = std::env::var(SMTP_USER);
    user_from_env.ok()
}

const SMTP_PASSWORD: &str = "SMTP_PASSWORD";

pub fn get_smtp_password() -> Option<String> {
    let password_from_env = std::env::var(SMTP_PASSWORD);
    password_from_env.ok()
}
