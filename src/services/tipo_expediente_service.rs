use std::sync::Arc;

use crate::{
    converters::expediente_converter::tipo_to_vo, errors::ApiResult,
    models::tipo_expediente_model::TipoExpedienteVo,
    repositories::tipo_expediente_repository::TipoExpedienteRepository,
};

#[derive(Clone)]
pub struct TipoExpedienteService {
    tipo_repo: Arc<dyn TipoExpedienteRepository>,
}

impl TipoExpedienteService {
    pub fn new(tipo_repo: Arc<dyn TipoExpedienteRepository>) -> Self {
        TipoExpedienteService { tipo_repo }
    }

    pub async fn list(&self) -> ApiResult<Vec<TipoExpedienteVo>> {
        let rows = self.tipo_repo.find_all().await?;
        Ok(rows.into_iter().map(tipo_to_vo).collect())
    }
}
