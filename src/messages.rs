//! Fixed messages returned to clients.

pub const ERROR_REQUIRED_FIELDS: &str =
    "Existem campos requeridos que não foram preenchidos, ou não atendem aos critérios de digitação !!";
pub const ERROR_INVALID_ID: &str = "O ID encaminhado na requisição não é válido !!";
pub const ERROR_INVALID_BODY: &str = "O corpo da requisição não é um JSON válido !!";
pub const ERROR_NOT_FOUND: &str = "Não foi encontrado nenhum item !!";
pub const ERROR_NO_RECORDS: &str = "Nenhum registro encontrado";
pub const ERROR_UNKNOWN_USER: &str = "O usuário vinculado ao endereço não existe !!";
pub const ERROR_CONTENT_TYPE: &str =
    "O content-type da requisição não é suportado na API. Deve-se encaminhar dados em formato application/json !!";
pub const ERROR_PAYLOAD_TOO_LARGE: &str = "O corpo da requisição excede o tamanho permitido !!";
pub const ERROR_INTERNAL_SERVER: &str =
    "Não foi possível processar a requisição, devido a um erro interno no servidor. Contate o administrador da API !!";
pub const ERROR_INTERNAL_SERVER_DB: &str =
    "Não foi possível processar a requisição, devido a um problema na comunicação com o banco de dados. Contate o administrador da API !!";

pub const SUCCESS_CREATED_ITEM: &str = "Item criado com sucesso !!";
pub const SUCCESS_UPDATED_ITEM: &str = "Item atualizado com sucesso !!";
pub const SUCCESS_DELETED_ITEM: &str = "Item removido com sucesso !!";
