use siftkit::{Accessor, CompareOp, PredicateShape, ResponseError, SearchExt as _, ValueSearch};

#[derive(Clone, Debug, Eq, PartialEq)]
struct Item {
    id: u32,
    price: i64,
    discount: i64,
}

const fn item(id: u32, price: i64, discount: i64) -> Item {
    Item {
        id,
        price,
        discount,
    }
}

fn inventory() -> Vec<Item> {
    vec![item(1, 100, 0), item(2, 250, 25), item(3, 400, 100)]
}

fn price() -> Accessor<Item, i64> {
    Accessor::new("price", |i: &Item| i.price)
}

fn discount() -> Accessor<Item, i64> {
    Accessor::new("discount", |i: &Item| i.discount)
}

fn ids<'a, I: IntoIterator<Item = &'a Item>>(matches: I) -> Vec<u32> {
    matches.into_iter().map(|i| i.id).collect()
}

#[test]
fn flat_search_filters_elements_directly() {
    let items = inventory();

    let search = ValueSearch::new(&items, price()).gt(150);
    assert_eq!(ids(&search), vec![2, 3]);

    let search = ValueSearch::new(&items, price()).between(100, 250);
    assert_eq!(ids(&search), vec![1, 2]);
}

#[test]
fn multi_value_equality_is_a_cross_product() {
    let items = inventory();

    // price or discount equal to any candidate
    let search = ValueSearch::new(&items, price())
        .with(discount())
        .eq_any(&[100, 25]);
    assert_eq!(ids(&search), vec![1, 2, 3]);

    let search = ValueSearch::new(&items, price()).eq_any(&[250, 400]);
    assert_eq!(ids(&search), vec![2, 3]);
}

#[test]
fn extension_trait_entry_point() {
    let items = inventory();
    let search = items.search_values(price()).lte(100);
    assert_eq!(ids(&search), vec![1]);
}

#[test]
fn cardinality_helpers() {
    let items = inventory();

    let unique = ValueSearch::new(&items, price()).eq(250);
    assert_eq!(unique.one().map(|i| i.id), Ok(2));
    assert_eq!(unique.count(), 1);

    let missing = ValueSearch::new(&items, price()).eq(9);
    assert_eq!(missing.one(), Err(ResponseError::NotFound));
    assert!(!missing.any_match());

    let ambiguous = ValueSearch::new(&items, price()).gte(100);
    assert_eq!(ambiguous.one(), Err(ResponseError::NotUnique { count: 3 }));
}

#[test]
fn shape_reports_accumulated_structure() {
    let items = inventory();

    let search = ValueSearch::new(&items, price());
    assert_eq!(search.shape(), None);

    let search = search.gt(100).lte(400);
    assert_eq!(
        search.shape(),
        Some(PredicateShape::And(vec![
            PredicateShape::Compare {
                accessor: "price".to_string(),
                op: CompareOp::Gt,
            },
            PredicateShape::Compare {
                accessor: "price".to_string(),
                op: CompareOp::Lte,
            },
        ]))
    );
}
