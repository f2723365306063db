use crate::domain::model::{
    PersonRecord, PurchaseOrderEntry, ReferenceIndex, Table, WorkOrderEntry,
};
use crate::domain::ports::ReferenceReader;
use crate::utils::error::{Result, TimesheetError};
use std::collections::{BTreeMap, BTreeSet};

/// Zero-based column positions in the Names table.
pub mod names_columns {
    pub const PERSON_COMPANY: usize = 0; // A
    pub const PERSON_NAME: usize = 1; // B
    pub const SAP_ID: usize = 2; // C
    pub const PERSON_ROLE: usize = 3; // D
    pub const ROLE: usize = 6; // G
    pub const SERVICE_MASTER: usize = 7; // H
    pub const COMPANY: usize = 9; // J
    pub const PO_NUMBER: usize = 10; // K
    pub const PO_ITEM: usize = 11; // L
}

/// Zero-based column positions in the Work Orders table.
pub mod work_order_columns {
    pub const WO_NUMBER: usize = 0; // A
    pub const OP_NUMBER: usize = 1; // B
    pub const WO_HEADER: usize = 2; // C
    pub const OP_SHORT_TEXT: usize = 3; // D
    pub const WORK_CENTER: usize = 4; // E
    pub const COMPANY: usize = 5; // F
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub names: String,
    pub work_orders: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            names: "Names".to_string(),
            work_orders: "Work Orders".to_string(),
        }
    }
}

/// Reads both source tables and builds the index. A missing table fails the whole build.
pub fn load_index<R: ReferenceReader + ?Sized>(
    reader: &R,
    tables: &TableNames,
) -> Result<ReferenceIndex> {
    let names = read_required(reader, &tables.names)?;
    let work_orders = read_required(reader, &tables.work_orders)?;
    Ok(build_index(&names, &work_orders))
}

fn read_required<R: ReferenceReader + ?Sized>(reader: &R, name: &str) -> Result<Table> {
    reader.read_table(name).map_err(|e| match e {
        TimesheetError::TableNotFound { name } => TimesheetError::MissingTable { name },
        other => other,
    })
}

pub fn build_index(names: &Table, work_orders: &Table) -> ReferenceIndex {
    let index = ReferenceIndex {
        companies: collect_companies(names),
        people_by_company: collect_people(names),
        service_master_by_role: collect_service_masters(names),
        po_by_company: collect_purchase_orders(names),
        work_orders_by_company: collect_work_orders(work_orders),
    };

    tracing::debug!(
        "Built reference index: {} companies, {} people, {} roles, {} purchase orders, {} work orders",
        index.companies.len(),
        index.people_by_company.values().map(Vec::len).sum::<usize>(),
        index.service_master_by_role.len(),
        index.po_by_company.len(),
        index.work_orders_by_company.values().map(Vec::len).sum::<usize>(),
    );

    index
}

fn collect_companies(names: &Table) -> Vec<String> {
    names
        .data_rows()
        .map(|row| row.text(names_columns::COMPANY))
        .filter(|company| !company.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn collect_people(names: &Table) -> BTreeMap<String, Vec<PersonRecord>> {
    let mut people: BTreeMap<String, Vec<PersonRecord>> = BTreeMap::new();

    for row in names.data_rows() {
        let company = row.text(names_columns::PERSON_COMPANY);
        let name = row.text(names_columns::PERSON_NAME);
        if company.is_empty() || name.is_empty() {
            continue;
        }

        people.entry(company).or_default().push(PersonRecord {
            name,
            sap_id: row.text(names_columns::SAP_ID),
            role: row.text(names_columns::PERSON_ROLE),
        });
    }

    people
}

fn collect_service_masters(names: &Table) -> BTreeMap<String, String> {
    let mut by_role = BTreeMap::new();

    for row in names.data_rows() {
        let role = row.text(names_columns::ROLE);
        let service_master = row.text(names_columns::SERVICE_MASTER);
        if !role.is_empty() && !service_master.is_empty() {
            by_role.insert(role.to_lowercase(), service_master);
        }
    }

    by_role
}

fn collect_purchase_orders(names: &Table) -> BTreeMap<String, PurchaseOrderEntry> {
    let mut by_company = BTreeMap::new();

    for row in names.data_rows() {
        let company = row.text(names_columns::COMPANY);
        if company.is_empty() {
            continue;
        }

        let po_number = row.text(names_columns::PO_NUMBER);
        let po_item = row.text(names_columns::PO_ITEM);
        if !po_number.is_empty() || !po_item.is_empty() {
            by_company.insert(company, PurchaseOrderEntry { po_number, po_item });
        }
    }

    by_company
}

fn collect_work_orders(work_orders: &Table) -> BTreeMap<String, Vec<WorkOrderEntry>> {
    let mut by_company: BTreeMap<String, Vec<WorkOrderEntry>> = BTreeMap::new();

    for row in work_orders.data_rows() {
        let company = row.text(work_order_columns::COMPANY);
        let wo_number = row.text(work_order_columns::WO_NUMBER);
        if company.is_empty() || wo_number.is_empty() {
            continue;
        }

        by_company.entry(company).or_default().push(WorkOrderEntry {
            wo_number,
            op_number: row.text(work_order_columns::OP_NUMBER),
            op_short_text: row.text(work_order_columns::OP_SHORT_TEXT),
            wo_header: row.text(work_order_columns::WO_HEADER),
            work_center: row.text(work_order_columns::WORK_CENTER),
        });
    }

    by_company
}

impl ReferenceIndex {
    pub fn people_for(&self, company: &str) -> &[PersonRecord] {
        self.people_by_company
            .get(company)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn work_orders_for(&self, company: &str) -> &[WorkOrderEntry] {
        self.work_orders_by_company
            .get(company)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// When a name repeats within a company the last entry wins.
    pub fn find_person(&self, company: &str, name: &str) -> Option<&PersonRecord> {
        self.people_for(company).iter().rev().find(|p| p.name == name)
    }

    pub fn find_work_order(&self, company: &str, selection_key: &str) -> Option<&WorkOrderEntry> {
        self.work_orders_for(company)
            .iter()
            .find(|wo| wo.selection_key() == selection_key)
    }

    pub fn service_master_for(&self, role: &str) -> Option<&str> {
        self.service_master_by_role
            .get(&role.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn purchase_order_for(&self, company: &str) -> Option<&PurchaseOrderEntry> {
        self.po_by_company.get(company)
    }
}
