//! Table rows for the availability and competitor pages.

use crate::{escape_html, format_price};
use comparely_insights::{classify_stock, competitor_pair};
use comparely_model::Product;

const ROW_OPEN: &str = "<tr class=\"border-b border-slate-100\">";
const CELL_PRIMARY: &str = "px-3 py-2 text-sm text-slate-800";
const CELL_MUTED: &str = "px-3 py-2 text-sm text-slate-600";

fn cell(class: &str, content: &str) -> String {
    format!("<td class=\"{class}\">{content}</td>")
}

/// One row per product: name, region, status badge, stock.
pub fn availability_rows<'a, I>(products: I) -> String
where
    I: IntoIterator<Item = &'a Product>,
{
    products
        .into_iter()
        .map(|p| {
            let status = classify_stock(p.stock);
            let badge = format!(
                "<span class=\"badge {}\">{}</span>",
                status.style_class(),
                status.label()
            );
            [
                ROW_OPEN.to_string(),
                cell(CELL_PRIMARY, &escape_html(&p.name)),
                cell(CELL_MUTED, &escape_html(&p.pincode)),
                cell("px-3 py-2 text-sm", &badge),
                cell(CELL_MUTED, &p.stock.to_string()),
                "</tr>".to_string(),
            ]
            .concat()
        })
        .collect()
}

/// One 8-column comparison row per product.
pub fn competitor_rows(products: &[Product]) -> String {
    products
        .iter()
        .map(|p| {
            let [a, b] = competitor_pair(p);
            let mut row = String::from(ROW_OPEN);
            row.push_str(&cell(CELL_PRIMARY, &escape_html(&p.name)));
            row.push_str(&cell(CELL_MUTED, &escape_html(&p.pincode)));
            for price in [p.price, a.price, b.price] {
                row.push_str(&cell(CELL_MUTED, &format_price(price)));
            }
            for stock in [p.stock, a.stock, b.stock] {
                row.push_str(&cell(CELL_MUTED, &stock.to_string()));
            }
            row.push_str("</tr>");
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use comparely_model::Competitor;

    #[test]
    fn test_availability_row_cells() {
        let products = vec![Product::new("Ghee <1L>", "560001", 8, 550.0)];
        let html = availability_rows(&products);

        assert_eq!(html.matches("<tr").count(), 1);
        assert_eq!(html.matches("<td").count(), 4);
        assert!(html.contains("Ghee &lt;1L&gt;"));
        assert!(html.contains("<span class=\"badge low-stock\">Low stock</span>"));
        assert!(html.contains(">8</td>"));
    }

    #[test]
    fn test_availability_rows_keep_order() {
        let products = vec![
            Product::new("Zeta", "2", 0, 1.0),
            Product::new("Alpha", "1", 30, 1.0),
        ];
        let html = availability_rows(&products);
        let zeta = html.find("Zeta").unwrap();
        let alpha = html.find("Alpha").unwrap();
        assert!(zeta < alpha);
        assert!(html.contains("out-of-stock"));
        assert!(html.contains("in-stock"));
    }

    #[test]
    fn test_competitor_row_columns() {
        let products = vec![Product::new("Paneer", "411001", 12, 90.0).with_competitors(vec![
            Competitor::new("Rival One", 30, 85.5),
            Competitor::new("Rival Two", 4, 99.0),
        ])];
        let html = competitor_rows(&products);

        let cells: Vec<&str> = html
            .split("<td class=\"")
            .skip(1)
            .map(|c| {
                let start = c.find('>').unwrap() + 1;
                let end = c.find("</td>").unwrap();
                &c[start..end]
            })
            .collect();
        assert_eq!(
            cells,
            vec!["Paneer", "411001", "90", "85.5", "99", "12", "30", "4"]
        );
    }
}
