use serde::Deserialize;
use vgapi_dal::{Filter, ListingParams, Order, Paging};

use crate::error::{ApiError, ApiResult};

const SORT_FIELD: &str = "created_at";
const PAGE_MESSAGE: &str = "El parámetro 'page' debe ser un número mayor que 0.";
const LIMIT_MESSAGE: &str = "El parámetro 'limit' debe ser un número mayor que 0.";

/// Query string of games listing.
///
/// Every parameter is optional and an empty value counts as missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct GameListQuery {
    /// Page number starting from 1, used only together with `limit`
    pub page: Option<String>,
    /// Page size, used only together with `page`
    pub limit: Option<String>,
    /// `ASC` for oldest first, any other value for newest first
    pub sort: Option<String>,
    /// Exact category match
    pub categorie: Option<String>,
    /// `active` or `inactive`
    pub status: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Leading integer of the value, ignoring leading whitespace and anything after the digits
/// (`"2abc"` is 2, `"10.5"` is 10), saturated to i64 range
fn parse_leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (negative, rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let number = rest[..digits].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -number } else { number })
}

fn parse_positive(value: &str) -> Option<i64> {
    parse_leading_int(value).filter(|n| *n >= 1)
}

impl GameListQuery {
    pub fn into_listing_params(self) -> ApiResult<ListingParams> {
        let mut params = ListingParams::default().with_related();

        if let (Some(page), Some(limit)) = (non_empty(self.page), non_empty(self.limit)) {
            let page =
                parse_positive(&page).ok_or_else(|| ApiError::InvalidQuery(PAGE_MESSAGE.into()))?;
            let limit = parse_positive(&limit)
                .ok_or_else(|| ApiError::InvalidQuery(LIMIT_MESSAGE.into()))?;
            let offset = (page - 1)
                .checked_mul(limit)
                .ok_or_else(|| ApiError::InvalidQuery(PAGE_MESSAGE.into()))?;
            params.paging = Some(Paging { offset, limit });
        }

        if let Some(sort) = non_empty(self.sort) {
            let order = if sort == "ASC" {
                Order::Asc(SORT_FIELD.to_string())
            } else {
                Order::Desc(SORT_FIELD.to_string())
            };
            params = params.with_order(vec![order]);
        }

        if let Some(categorie) = non_empty(self.categorie) {
            params = params.with_filter(Filter::eq("categorie", categorie));
        }

        if let Some(status) = non_empty(self.status) {
            params = params.with_filter(Filter::eq("status", status));
        }

        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> GameListQuery {
        let mut q = GameListQuery::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "page" => q.page = v,
                "limit" => q.limit = v,
                "sort" => q.sort = v,
                "categorie" => q.categorie = v,
                "status" => q.status = v,
                _ => panic!("unknown param {k}"),
            }
        }
        q
    }

    #[test]
    fn test_no_params() {
        let params = GameListQuery::default().into_listing_params().unwrap();
        assert_eq!(params.paging, None);
        assert_eq!(params.order, None);
        assert!(params.filters.is_empty());
        assert!(params.include_related);
    }

    #[test]
    fn test_paging() {
        let params = query(&[("page", "2"), ("limit", "10")])
            .into_listing_params()
            .unwrap();
        assert_eq!(
            params.paging,
            Some(Paging {
                offset: 10,
                limit: 10
            })
        );

        let params = query(&[("page", "1"), ("limit", "5")])
            .into_listing_params()
            .unwrap();
        assert_eq!(params.paging, Some(Paging { offset: 0, limit: 5 }));

        // both are needed
        for pairs in [
            &[("page", "2")][..],
            &[("limit", "10")][..],
            &[("page", "2"), ("limit", "")][..],
            &[("page", "abc")][..],
        ] {
            let params = query(pairs).into_listing_params().unwrap();
            assert_eq!(params.paging, None);
        }
    }

    #[test]
    fn test_invalid_paging() {
        for (pairs, msg) in [
            (&[("page", "0"), ("limit", "10")][..], PAGE_MESSAGE),
            (&[("page", "-1"), ("limit", "10")][..], PAGE_MESSAGE),
            (&[("page", "x"), ("limit", "0")][..], PAGE_MESSAGE),
            (&[("page", "1"), ("limit", "0")][..], LIMIT_MESSAGE),
            (&[("page", "1"), ("limit", "ten")][..], LIMIT_MESSAGE),
        ] {
            match query(pairs).into_listing_params() {
                Err(ApiError::InvalidQuery(m)) => assert_eq!(m, msg),
                other => panic!("unexpected result {other:?} for {pairs:?}"),
            }
        }
    }

    #[test]
    fn test_sort() {
        let params = query(&[("sort", "ASC")]).into_listing_params().unwrap();
        assert_eq!(params.order, Some(vec![Order::Asc("created_at".into())]));

        for sort in ["DESC", "asc", "whatever"] {
            let params = query(&[("sort", sort)]).into_listing_params().unwrap();
            assert_eq!(params.order, Some(vec![Order::Desc("created_at".into())]));
        }

        let params = query(&[("sort", "")]).into_listing_params().unwrap();
        assert_eq!(params.order, None);
    }

    #[test]
    fn test_filters() {
        let params = query(&[("categorie", "rpg"), ("status", "active")])
            .into_listing_params()
            .unwrap();
        assert_eq!(
            params.filters,
            vec![Filter::eq("categorie", "rpg"), Filter::eq("status", "active")]
        );

        let params = query(&[("status", "inactive")])
            .into_listing_params()
            .unwrap();
        assert_eq!(params.filters, vec![Filter::eq("status", "inactive")]);

        let params = query(&[("categorie", ""), ("status", "")])
            .into_listing_params()
            .unwrap();
        assert!(params.filters.is_empty());

        // unknown status is plain filter value, it just matches nothing
        for status in ["deleted", "Active"] {
            let params = query(&[("status", status)]).into_listing_params().unwrap();
            assert_eq!(params.filters, vec![Filter::eq("status", status)]);
        }
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(parse_leading_int("2abc"), Some(2));
        assert_eq!(parse_leading_int(" 3"), Some(3));
        assert_eq!(parse_leading_int("10.5"), Some(10));
        assert_eq!(parse_leading_int("+7"), Some(7));
        assert_eq!(parse_leading_int("-4"), Some(-4));
        assert_eq!(parse_leading_int("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int(""), None);
    }

    #[test]
    fn test_lenient_paging() {
        let params = query(&[("page", "2abc"), ("limit", "10.5")])
            .into_listing_params()
            .unwrap();
        assert_eq!(
            params.paging,
            Some(Paging {
                offset: 10,
                limit: 10
            })
        );

        let params = query(&[("page", " 3"), ("limit", "5")])
            .into_listing_params()
            .unwrap();
        assert_eq!(params.paging, Some(Paging { offset: 10, limit: 5 }));

        assert!(matches!(
            query(&[("page", "0.9"), ("limit", "5")]).into_listing_params(),
            Err(ApiError::InvalidQuery(m)) if m == PAGE_MESSAGE
        ));
    }
}
