/// Registration input as received from the client. The password is
/// plaintext here and must be hashed before it reaches storage.
#[derive(Debug, Clone)]
pub struct RegisterUserDto {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}
