// src/services/statistics_service.rs
//
// O motor de estatísticas: agregação de totais, sugestões e a montagem
// da resposta. As funções de cálculo são puras e síncronas; o `now` é
// sempre um parâmetro explícito para os testes controlarem o relógio.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ItemRepository,
    models::stats::{
        seeded_reason_map, Aggregates, ItemStats, NoSalesSuggestion, RankedCategory, RankedItem,
        RestockSuggestion, StatisticsResponse, Suggestions,
    },
    services::auth::check_business,
};

// Fonte da projeção de itens; trait para os testes trocarem o banco por memória
#[async_trait]
pub trait ItemStatsSource: Send + Sync {
    async fn fetch_item_stats(&self, business_id: Uuid) -> Result<Vec<ItemStats>, AppError>;
}

#[async_trait]
impl ItemStatsSource for ItemRepository {
    async fn fetch_item_stats(&self, business_id: Uuid) -> Result<Vec<ItemStats>, AppError> {
        ItemRepository::fetch_item_stats(self, business_id).await
    }
}

#[derive(Clone)]
pub struct StatisticsService {
    source: Arc<dyn ItemStatsSource>,
}

impl StatisticsService {
    pub fn new(source: Arc<dyn ItemStatsSource>) -> Self {
        Self { source }
    }

    // Checa a posse, busca a projeção uma única vez e roda o motor
    // inteiro sobre o mesmo snapshot.
    pub async fn get_statistics(
        &self,
        claims_business_id: Option<Uuid>,
        business_id: Uuid,
    ) -> Result<StatisticsResponse, AppError> {
        check_business(claims_business_id, business_id)?;

        let items = self.source.fetch_item_stats(business_id).await?;
        Ok(assemble(&items, Utc::now()))
    }
}

// Monta a resposta completa a partir de um snapshot
pub fn assemble(items: &[ItemStats], now: DateTime<Utc>) -> StatisticsResponse {
    let mut diagnostics = Vec::new();
    let aggregates = aggregate(items, &mut diagnostics);
    let suggestions = build_suggestions(items, now);

    StatisticsResponse {
        overall_performance: aggregates.overall_totals,
        category_breakdown: aggregates.category_totals,
        sales_by_month: aggregates.sales_by_year_and_month,
        deductions_by_month: aggregates.deductions_by_year_and_month,
        suggestions,
        diagnostics,
    }
}

// Interpreta o timestamp textual de um evento. Aceita RFC3339 e as
// variantes sem fuso que o gravador histórico produzia.
fn parse_event_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}

/// Agrega os totais da loja: desempenho geral por motivo, quebra por
/// categoria, vendas por ano/mês e deduções por ano/mês.
///
/// Valores entram sempre em módulo. Um evento com timestamp ilegível é
/// pulado por inteiro e vira uma linha em `diagnostics`.
pub fn aggregate(items: &[ItemStats], diagnostics: &mut Vec<String>) -> Aggregates {
    let mut aggregates = Aggregates::new();
    let Aggregates {
        overall_totals,
        category_totals,
        sales_by_year_and_month,
        deductions_by_year_and_month,
    } = &mut aggregates;

    for item in items {
        // Categoria ganha o mapa zerado na primeira vez que aparece
        let category_map = category_totals
            .entry(item.category.clone())
            .or_insert_with(seeded_reason_map);

        for event in &item.events {
            let amount_abs = event.amount.abs();
            let raw_amount = event.amount;

            let date = match parse_event_timestamp(&event.timestamp) {
                Some(date) => date,
                None => {
                    let report = format!(
                        "Evento ignorado no item {}: data '{}' inválida",
                        item.sku, event.timestamp
                    );
                    tracing::warn!("{}", report);
                    diagnostics.push(report);
                    continue;
                }
            };
            let year = date.year();
            let month = date.format("%b").to_string();

            // Desempenho geral: motivos desconhecidos ganham chave nova
            *overall_totals.entry(event.reason.clone()).or_insert(0) += amount_abs;

            // Quebra por categoria, mesma regra
            *category_map.entry(event.reason.clone()).or_insert(0) += amount_abs;

            // Vendas por ano e mês
            if event.reason == "Sale" {
                *sales_by_year_and_month
                    .entry(year)
                    .or_default()
                    .entry(month.clone())
                    .or_insert(0) += amount_abs;
            }

            // Deduções: motivo fora de Sale/Order E valor bruto negativo.
            // A dupla condição é deliberada e coberta por teste.
            if event.reason != "Sale" && event.reason != "Order" && raw_amount < 0 {
                *deductions_by_year_and_month
                    .entry(year)
                    .or_default()
                    .entry(month)
                    .or_insert(0) += amount_abs;
            }
        }
    }

    aggregates
}

fn difference_in_days(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    (later - earlier).num_days()
}

// Média dos intervalos entre vendas, em dias inteiros por intervalo.
// Só é chamada com duas datas ou mais.
fn average_days_between_sales(sale_dates: &[DateTime<Utc>]) -> i64 {
    let mut sorted = sale_dates.to_vec();
    sorted.sort();

    let mut total_days = 0i64;
    for pair in sorted.windows(2) {
        total_days += (pair[1] - pair[0]).num_days();
    }
    total_days / (sorted.len() as i64 - 1)
}

fn parse_ratio_key(key: &str) -> Option<(i64, i64)> {
    let (interval, stock) = key.split_once(':')?;
    Some((interval.parse().ok()?, stock.parse().ok()?))
}

// Ordena chaves "intervalo:estoque" numericamente: o intervalo domina,
// o estoque desempata, e a própria string fecha a ordem total.
fn ratio_key_ordering(a: &str, b: &str) -> Ordering {
    match (parse_ratio_key(a), parse_ratio_key(b)) {
        (Some(left), Some(right)) => left.cmp(&right).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

// Atualização "última escrita vence" preservando a posição da primeira
// inserção, como um dicionário que mantém ordem de chegada.
fn upsert<V>(entries: &mut Vec<(String, V)>, key: String, value: V) {
    if let Some(entry) = entries.iter_mut().find(|(existing, _)| *existing == key) {
        entry.1 = value;
    } else {
        entries.push((key, value));
    }
}

/// Constrói as sugestões a partir do mesmo snapshot usado na agregação.
///
/// Cada ranking segue "última escrita vence" nos empates, na ordem em
/// que os itens chegam (ordenados por SKU na busca). Toda sugestão some
/// quando o conjunto está vazio ou o vencedor não é positivo.
pub fn build_suggestions(items: &[ItemStats], now: DateTime<Utc>) -> Suggestions {
    if items.is_empty() {
        return Suggestions::default();
    }

    let mut item_sales: BTreeMap<i64, &ItemStats> = BTreeMap::new();
    let mut item_returns: BTreeMap<i64, &ItemStats> = BTreeMap::new();
    let mut time_no_sales: BTreeMap<i64, &ItemStats> = BTreeMap::new();
    // Volume por categoria: a escrita de cada item SOBRESCREVE a anterior
    // da mesma categoria, não acumula. Comportamento documentado por teste.
    let mut category_sales: Vec<(String, i64)> = Vec::new();
    let mut sales_stock_ratio: Vec<(String, &ItemStats)> = Vec::new();

    for item in items {
        let mut sales = 0i64;
        let mut returns = 0i64;
        let mut sale_dates: Vec<DateTime<Utc>> = Vec::new();
        let mut most_recent_sale: Option<DateTime<Utc>> = None;

        for event in &item.events {
            let amount = event.amount.abs();
            let date = match parse_event_timestamp(&event.timestamp) {
                Some(date) => date,
                // Já reportado pela agregação sobre o mesmo snapshot
                None => continue,
            };

            if event.reason == "Sale" {
                sales += amount;
                sale_dates.push(date);
                if most_recent_sale.is_none_or(|current| date > current) {
                    most_recent_sale = Some(date);
                }
            }
            // "Returned" é um literal distinto do motivo fixo "Return"
            if event.reason == "Returned" {
                returns += amount;
            }
        }

        if let Some(most_recent) = most_recent_sale {
            let days_without_sale = difference_in_days(most_recent, now);
            time_no_sales.insert(days_without_sale, item);

            if sale_dates.len() > 1 {
                sale_dates.push(now);
                let interval = average_days_between_sales(&sale_dates);
                let key = format!("{}:{}", interval, item.stock_level);
                upsert(&mut sales_stock_ratio, key, item);
            }
        }

        item_sales.insert(sales, item);
        upsert(&mut category_sales, item.category.clone(), sales);
        item_returns.insert(returns, item);
    }

    // Ordenação estável: empates de volume preservam a ordem de chegada
    let mut sorted_categories = category_sales.clone();
    sorted_categories.sort_by(|a, b| b.1.cmp(&a.1));

    let mut sorted_ratio = sales_stock_ratio;
    sorted_ratio.sort_by(|a, b| ratio_key_ordering(&a.0, &b.0));

    let ranked_item = |entry: Option<(&i64, &&ItemStats)>| -> Option<RankedItem> {
        entry
            .filter(|(value, _)| **value > 0)
            .map(|(value, item)| RankedItem {
                value: *value,
                sku: item.sku.clone(),
                name: item.name.clone(),
            })
    };

    let ranked_category = |entry: Option<&(String, i64)>| -> Option<RankedCategory> {
        entry
            .filter(|(_, value)| *value > 0)
            .map(|(category, value)| RankedCategory {
                value: *value,
                category: category.clone(),
            })
    };

    let longest_no_sales = time_no_sales
        .iter()
        .next_back()
        .filter(|(days, _)| **days > 0)
        .map(|(days, item)| NoSalesSuggestion {
            period: format!("{} days", days),
            sku: item.sku.clone(),
            name: item.name.clone(),
        });

    let item_to_restock = sorted_ratio.last().map(|(key, item)| RestockSuggestion {
        sales_stock_ratio: key.clone(),
        sku: item.sku.clone(),
        name: item.name.clone(),
    });

    Suggestions {
        best_selling_item: ranked_item(item_sales.iter().next_back()),
        worst_selling_item: ranked_item(item_sales.iter().next()),
        best_selling_category: ranked_category(sorted_categories.first()),
        worst_selling_category: ranked_category(sorted_categories.last()),
        most_returned_item: ranked_item(item_returns.iter().next_back()),
        longest_no_sales,
        item_to_restock,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stats::StockEvent;

    fn item(sku: &str, category: &str, stock: i64, events: Vec<StockEvent>) -> ItemStats {
        ItemStats {
            sku: sku.to_string(),
            name: format!("Item {}", sku),
            category: category.to_string(),
            stock_level: stock,
            events,
        }
    }

    fn event(reason: &str, amount: i64, timestamp: &str) -> StockEvent {
        StockEvent {
            reason: reason.to_string(),
            amount,
            timestamp: timestamp.to_string(),
        }
    }

    fn utc(date: &str) -> DateTime<Utc> {
        parse_event_timestamp(date).unwrap()
    }

    struct FixedSource(Vec<ItemStats>);

    #[async_trait]
    impl ItemStatsSource for FixedSource {
        async fn fetch_item_stats(&self, _business_id: Uuid) -> Result<Vec<ItemStats>, AppError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn servico_nega_negocio_de_outro_token() {
        let service = StatisticsService::new(Arc::new(FixedSource(Vec::new())));
        let own = Uuid::new_v4();
        let other = Uuid::new_v4();

        let err = service.get_statistics(Some(own), other).await.unwrap_err();
        assert!(matches!(err, AppError::BusinessAccessDenied));
        assert!(service.get_statistics(Some(own), own).await.is_ok());
    }

    #[test]
    fn timestamp_aceita_rfc3339_e_variantes() {
        assert!(parse_event_timestamp("2024-03-15T10:30:00Z").is_some());
        assert!(parse_event_timestamp("2024-03-15T10:30:00+02:00").is_some());
        assert!(parse_event_timestamp("2024-03-15T10:30:00").is_some());
        assert!(parse_event_timestamp("2024-03-15 10:30:00").is_some());
        assert!(parse_event_timestamp("2024-03-15").is_some());
        assert!(parse_event_timestamp("ontem").is_none());
    }

    #[test]
    fn venda_negativa_entra_no_mes_em_modulo() {
        let items = vec![item(
            "A-1",
            "Doces",
            10,
            vec![event("Sale", -7, "2024-03-15T00:00:00Z")],
        )];
        let mut diagnostics = Vec::new();
        let aggregates = aggregate(&items, &mut diagnostics);

        assert_eq!(aggregates.sales_by_year_and_month[&2024]["Mar"], 7);
        assert!(aggregates.deductions_by_year_and_month.is_empty());
        assert_eq!(aggregates.overall_totals["Sale"], 7);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn deducao_exige_motivo_e_sinal() {
        let items = vec![item(
            "A-1",
            "Doces",
            10,
            vec![
                event("Damaged", -3, "2024-05-02T00:00:00Z"),
                event("Damaged", 4, "2024-05-02T00:00:00Z"),
                event("Order", -5, "2024-05-02T00:00:00Z"),
            ],
        )];
        let mut diagnostics = Vec::new();
        let aggregates = aggregate(&items, &mut diagnostics);

        // Só o Damaged negativo entra na dedução; os dois somam no total
        assert_eq!(aggregates.deductions_by_year_and_month[&2024]["May"], 3);
        assert_eq!(aggregates.overall_totals["Damaged"], 7);
        assert_eq!(aggregates.overall_totals["Order"], 5);
    }

    #[test]
    fn media_de_intervalos_entre_vendas() {
        let dates = vec![
            utc("2024-01-01"),
            utc("2024-01-11"),
            utc("2024-01-21"),
            utc("2024-01-26"),
        ];
        assert_eq!(average_days_between_sales(&dates), 8);
    }

    #[test]
    fn ordenacao_da_chave_de_reposicao_e_numerica() {
        assert_eq!(ratio_key_ordering("9:5", "10:1"), Ordering::Less);
        assert_eq!(ratio_key_ordering("10:2", "10:10"), Ordering::Less);
        assert_eq!(ratio_key_ordering("3:7", "3:7"), Ordering::Equal);
    }

    #[test]
    fn snapshot_vazio_devolve_totais_zerados_e_sem_sugestoes() {
        let response = assemble(&[], utc("2024-06-01"));

        for reason in crate::models::stats::FIXED_REASONS {
            assert_eq!(response.overall_performance[reason], 0);
        }
        assert!(response.category_breakdown.is_empty());
        assert!(response.sales_by_month.is_empty());
        assert!(response.deductions_by_month.is_empty());
        assert_eq!(response.suggestions, Suggestions::default());
        assert!(response.diagnostics.is_empty());
    }

    #[test]
    fn totais_por_categoria_conservam_o_total_geral() {
        let items = vec![
            item(
                "A-1",
                "Doces",
                10,
                vec![
                    event("Sale", -3, "2024-01-05T00:00:00Z"),
                    event("Damaged", -1, "2024-01-06T00:00:00Z"),
                ],
            ),
            item(
                "B-1",
                "Bebidas",
                20,
                vec![
                    event("Sale", -5, "2024-02-01T00:00:00Z"),
                    event("Restocked", 8, "2024-02-02T00:00:00Z"),
                ],
            ),
            item("B-2", "Bebidas", 4, vec![event("Sale", -2, "2024-02-10T00:00:00Z")]),
        ];
        let mut diagnostics = Vec::new();
        let aggregates = aggregate(&items, &mut diagnostics);

        for (reason, total) in &aggregates.overall_totals {
            let per_category: i64 = aggregates
                .category_totals
                .values()
                .map(|map| map.get(reason).copied().unwrap_or(0))
                .sum();
            assert_eq!(per_category, *total, "motivo {}", reason);
        }
        assert_eq!(aggregates.overall_totals["Sale"], 10);
        assert_eq!(aggregates.category_totals["Bebidas"]["Sale"], 7);
    }

    #[test]
    fn evento_malformado_vira_diagnostico_e_nao_soma() {
        let items = vec![item(
            "A-1",
            "Doces",
            10,
            vec![
                event("Sale", -3, "quando der"),
                event("Sale", -2, "2024-01-05T00:00:00Z"),
            ],
        )];
        let response = assemble(&items, utc("2024-06-01"));

        assert_eq!(response.overall_performance["Sale"], 2);
        assert_eq!(response.diagnostics.len(), 1);
        assert!(response.diagnostics[0].contains("A-1"));
        assert!(response.diagnostics[0].contains("quando der"));
    }

    #[test]
    fn sem_vendas_nenhum_ranking_de_item_aparece() {
        let items = vec![
            item("A-1", "Doces", 10, vec![event("Restocked", 5, "2024-01-05T00:00:00Z")]),
            item("B-1", "Bebidas", 3, vec![]),
        ];
        let suggestions = build_suggestions(&items, utc("2024-06-01"));

        assert!(suggestions.best_selling_item.is_none());
        assert!(suggestions.worst_selling_item.is_none());
        assert!(suggestions.best_selling_category.is_none());
        assert!(suggestions.worst_selling_category.is_none());
        assert!(suggestions.most_returned_item.is_none());
        assert!(suggestions.longest_no_sales.is_none());
        assert!(suggestions.item_to_restock.is_none());
    }

    #[test]
    fn melhor_e_pior_vendedor_com_vendas_mistas() {
        let now = utc("2024-06-01");
        let items = vec![
            item("A-1", "Doces", 10, vec![event("Sale", -9, "2024-05-01T00:00:00Z")]),
            item("B-1", "Bebidas", 10, vec![event("Sale", -2, "2024-05-02T00:00:00Z")]),
            item("C-1", "Doces", 10, vec![]),
        ];
        let suggestions = build_suggestions(&items, now);

        let best = suggestions.best_selling_item.unwrap();
        assert_eq!((best.sku.as_str(), best.value), ("A-1", 9));
        // O pior vendedor precisa ter vendido algo; C-1 com zero fica de fora
        assert!(suggestions.worst_selling_item.is_none());

        // C-1 (Doces, zero vendas) sobrescreve o volume de Doces,
        // então Bebidas assume a liderança.
        let best_cat = suggestions.best_selling_category.unwrap();
        assert_eq!((best_cat.category.as_str(), best_cat.value), ("Bebidas", 2));
        assert!(suggestions.worst_selling_category.is_none());
    }

    #[test]
    fn volume_da_categoria_fica_com_o_ultimo_item() {
        // Dois itens da mesma categoria: o volume registrado para a
        // categoria é o do último a ser processado, não a soma.
        let now = utc("2024-06-01");
        let items = vec![
            item("A-1", "Doces", 10, vec![event("Sale", -9, "2024-05-01T00:00:00Z")]),
            item("A-2", "Doces", 10, vec![event("Sale", -2, "2024-05-02T00:00:00Z")]),
        ];
        let suggestions = build_suggestions(&items, now);

        let best_cat = suggestions.best_selling_category.unwrap();
        assert_eq!((best_cat.category.as_str(), best_cat.value), ("Doces", 2));
    }

    #[test]
    fn reposicao_escolhe_a_maior_chave_e_e_deterministica() {
        let now = utc("2024-01-31");
        let items = vec![
            // Intervalo médio curto, estoque baixo
            item(
                "A-1",
                "Doces",
                2,
                vec![
                    event("Sale", -1, "2024-01-01T00:00:00Z"),
                    event("Sale", -1, "2024-01-05T00:00:00Z"),
                    event("Sale", -1, "2024-01-29T00:00:00Z"),
                ],
            ),
            // Intervalo médio maior domina a chave
            item(
                "B-1",
                "Bebidas",
                50,
                vec![
                    event("Sale", -1, "2024-01-01T00:00:00Z"),
                    event("Sale", -1, "2024-01-21T00:00:00Z"),
                ],
            ),
            // Só uma venda: fica fora do ranking de reposição
            item("C-1", "Doces", 1, vec![event("Sale", -1, "2024-01-15T00:00:00Z")]),
        ];

        let first = build_suggestions(&items, now);
        let second = build_suggestions(&items, now);
        assert_eq!(first.item_to_restock, second.item_to_restock);

        let restock = first.item_to_restock.unwrap();
        assert_eq!(restock.sku, "B-1");
        // Intervalos de B-1: 20 e 10 dias, média 15; estoque 50
        assert_eq!(restock.sales_stock_ratio, "15:50");
    }

    #[test]
    fn item_sem_vender_ha_mais_tempo_traz_o_periodo_em_dias() {
        let now = utc("2024-06-01");
        let items = vec![
            item("A-1", "Doces", 10, vec![event("Sale", -1, "2024-05-20T00:00:00Z")]),
            item("B-1", "Bebidas", 10, vec![event("Sale", -1, "2024-03-03T00:00:00Z")]),
        ];
        let suggestions = build_suggestions(&items, now);

        let stale = suggestions.longest_no_sales.unwrap();
        assert_eq!(stale.sku, "B-1");
        assert_eq!(stale.period, "90 days");
    }

    #[test]
    fn returned_nao_se_mistura_com_return() {
        let now = utc("2024-06-01");
        let items = vec![item(
            "A-1",
            "Doces",
            10,
            vec![
                event("Return", -4, "2024-05-01T00:00:00Z"),
                event("Returned", -2, "2024-05-02T00:00:00Z"),
            ],
        )];

        let suggestions = build_suggestions(&items, now);
        let returned = suggestions.most_returned_item.unwrap();
        assert_eq!(returned.value, 2);

        let mut diagnostics = Vec::new();
        let aggregates = aggregate(&items, &mut diagnostics);
        assert_eq!(aggregates.overall_totals["Return"], 4);
        assert_eq!(aggregates.overall_totals["Returned"], 2);
    }
}
