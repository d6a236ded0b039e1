// src/models/stats.rs

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

/// Os sete motivos fixos que sempre aparecem zerados nos totais,
/// mesmo sem nenhum evento registrado.
pub const FIXED_REASONS: [&str; 7] = [
    "Sale",
    "Order",
    "Return",
    "Giveaway",
    "Damaged",
    "Restocked",
    "Lost",
];

// Um evento de estoque na projeção usada pelo motor de estatísticas.
// O timestamp fica como texto e é interpretado na hora da agregação.
#[derive(Debug, Clone)]
pub struct StockEvent {
    pub reason: String,
    pub amount: i64,
    pub timestamp: String,
}

// Projeção de um item com os seus eventos, na ordem em que foram gravados
#[derive(Debug, Clone)]
pub struct ItemStats {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub stock_level: i64,
    pub events: Vec<StockEvent>,
}

// Totais agregados da loja. Mapas dinâmicos por natureza:
// motivos desconhecidos ganham chave própria.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub overall_totals: BTreeMap<String, i64>,
    pub category_totals: BTreeMap<String, BTreeMap<String, i64>>,
    pub sales_by_year_and_month: BTreeMap<i32, BTreeMap<String, i64>>,
    pub deductions_by_year_and_month: BTreeMap<i32, BTreeMap<String, i64>>,
}

impl Aggregates {
    // Começa com os sete motivos fixos zerados
    pub fn new() -> Self {
        Self {
            overall_totals: seeded_reason_map(),
            category_totals: BTreeMap::new(),
            sales_by_year_and_month: BTreeMap::new(),
            deductions_by_year_and_month: BTreeMap::new(),
        }
    }
}

impl Default for Aggregates {
    fn default() -> Self {
        Self::new()
    }
}

pub fn seeded_reason_map() -> BTreeMap<String, i64> {
    FIXED_REASONS
        .iter()
        .map(|reason| (reason.to_string(), 0))
        .collect()
}

// Um item apontado por uma sugestão, com o valor que o rankeou
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankedItem {
    pub value: i64,
    pub sku: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankedCategory {
    pub value: i64,
    pub category: String,
}

// Item sem vendas há mais tempo; o período vem formatado ("12 days")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoSalesSuggestion {
    pub period: String,
    pub sku: String,
    pub name: String,
}

// Candidato a reposição, com a chave "intervalo:estoque" que o rankeou
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestockSuggestion {
    pub sales_stock_ratio: String,
    pub sku: String,
    pub name: String,
}

// Todas as sugestões são opcionais: sem dados suficientes, o campo some.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Suggestions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_selling_item: Option<RankedItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worst_selling_item: Option<RankedItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_selling_category: Option<RankedCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worst_selling_category: Option<RankedCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_returned_item: Option<RankedItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longest_no_sales: Option<NoSalesSuggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_to_restock: Option<RestockSuggestion>,
}

// Resposta completa do endpoint de estatísticas
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    pub overall_performance: BTreeMap<String, i64>,
    pub category_breakdown: BTreeMap<String, BTreeMap<String, i64>>,
    pub sales_by_month: BTreeMap<i32, BTreeMap<String, i64>>,
    pub deductions_by_month: BTreeMap<i32, BTreeMap<String, i64>>,
    pub suggestions: Suggestions,

    // Eventos ignorados por dados malformados; omitido quando vazio
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}
