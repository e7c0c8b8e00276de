use crate::config::RelayConfig;
use crate::domain::model::{EvidenceLevel, GenerateRequest};
use serde_json::{json, Value};

pub const RESPONSE_MIME_TYPE: &str = "application/json";

pub const SYSTEM_INSTRUCTION: &str = r#"Eres un verificador de datos riguroso con acceso a la evidencia científica más reciente. Analiza la afirmación del usuario y responde SIEMPRE con un único objeto JSON que describa una "tarjeta de mito". No pidas aclaraciones: da la mejor respuesta posible con la información recibida.
1. Reformula la afirmación en el campo "myth" y decide en "isTrue" si es verdadera o falsa.
2. Escribe DOS explicaciones, ambas obligatorias:
   - "explanation_simple": lenguaje claro y sencillo, sin tecnicismos, para cualquier persona.
   - "explanation_expert": explicación técnica y precisa para profesionales del área.
3. Clasifica la solidez de la evidencia en "evidenceLevel" con uno de estos valores: "Alta", "Moderada" o "Baja".
4. En "sources" lista de 2 a 3 TIPOS de fuente genéricos, por ejemplo "Metaanálisis", "Revisiones sistemáticas", "Ensayos clínicos aleatorizados" o "Guías de práctica clínica". NUNCA incluyas citas literales, autores, años, títulos de revistas, enlaces ni direcciones web.
5. Asigna en "category" una única categoría breve (por ejemplo "Nutrición" o "Suplementos").
6. En "relatedMyths" sugiere de 2 a 3 mitos relacionados.
Ningún campo puede contener URLs."#;

/// Gemini response schema (OpenAPI subset) for a Verdict.
pub fn response_schema() -> Value {
    let levels: Vec<&str> = EvidenceLevel::ALL.iter().map(|level| level.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "myth": { "type": "STRING" },
            "isTrue": { "type": "BOOLEAN" },
            "explanation_simple": { "type": "STRING" },
            "explanation_expert": { "type": "STRING" },
            "evidenceLevel": { "type": "STRING", "enum": levels },
            "sources": { "type": "ARRAY", "items": { "type": "STRING" } },
            "category": { "type": "STRING" },
            "relatedMyths": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": [
            "myth",
            "isTrue",
            "explanation_simple",
            "explanation_expert",
            "evidenceLevel",
            "sources",
            "category",
            "relatedMyths"
        ]
    })
}

pub fn build_request(config: &RelayConfig, query: &str) -> GenerateRequest {
    GenerateRequest {
        model: config.model.clone(),
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        user_text: query.to_string(),
        response_schema: response_schema(),
        response_mime_type: RESPONSE_MIME_TYPE.to_string(),
        temperature: config.temperature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_requires_every_verdict_field() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();

        for field in schema["properties"].as_object().unwrap().keys() {
            assert!(required.contains(&field.as_str()), "{} not required", field);
        }
        assert_eq!(
            schema["properties"]["evidenceLevel"]["enum"],
            json!(["Alta", "Moderada", "Baja"])
        );
    }

    #[test]
    fn test_build_request_uses_config() {
        let config = RelayConfig::new("k").with_model("gemini-custom");
        let request = build_request(&config, "¿El azúcar causa hiperactividad?");

        assert_eq!(request.model, "gemini-custom");
        assert_eq!(request.user_text, "¿El azúcar causa hiperactividad?");
        assert_eq!(request.response_mime_type, "application/json");
        assert_eq!(request.temperature, config.temperature);
        assert!(request.system_instruction.contains("explanation_expert"));
    }
}
