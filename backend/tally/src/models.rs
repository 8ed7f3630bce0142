use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumbersResponse {
    pub success: bool,
    pub last_dispatch_numbers: Numbers,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct Numbers {
    pub letters: u64,
    pub others: u64,
}
