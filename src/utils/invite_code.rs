use uuid::Uuid;

pub const INVITE_CODE_LEN: usize = 8;

/// Short public join handle: the first eight hex digits of a v4 UUID.
pub fn generate_invite_code() -> String {
    let mut code = Uuid::new_v4().simple().to_string();
    code.truncate(INVITE_CODE_LEN);
    code
}
