use crate::domain::model::{EntryRow, ExportLine, ReferenceIndex, Submission, WorkOrderBlock};
use crate::utils::error::{Result, TimesheetError};

/// Turns a submission into export lines, stopping at the first invalid entry.
pub fn assemble_lines(submission: &Submission, index: &ReferenceIndex) -> Result<Vec<ExportLine>> {
    let date_iso = submission.date_iso.trim();
    let company = submission.company.trim();

    if date_iso.is_empty() {
        return Err(TimesheetError::MissingDate);
    }
    if company.is_empty() {
        return Err(TimesheetError::MissingCompany);
    }
    if submission.blocks.is_empty() {
        return Err(TimesheetError::NoWorkOrders);
    }

    let purchase_order = index.purchase_order_for(company).cloned().unwrap_or_default();
    let mut lines = Vec::new();

    for (block_index, block) in submission.blocks.iter().enumerate() {
        if !is_complete(block) {
            return Err(TimesheetError::IncompleteWorkOrder { block: block_index });
        }

        for (row_index, row) in block.rows.iter().enumerate() {
            if is_placeholder(row) {
                continue;
            }

            let employee_name = row.employee_name.trim();
            if employee_name.is_empty() {
                return Err(TimesheetError::MissingPerson {
                    block: block_index,
                    row: row_index,
                });
            }

            let person = index.find_person(company, employee_name).ok_or(
                TimesheetError::PersonNotFound {
                    block: block_index,
                    row: row_index,
                },
            )?;

            let hours = parse_hours(&row.hours).ok_or(TimesheetError::InvalidHours {
                block: block_index,
                row: row_index,
            })?;

            lines.push(ExportLine {
                date_iso: date_iso.to_string(),
                company: company.to_string(),
                employee_name: person.name.clone(),
                sap_id: person.sap_id.clone(),
                role: person.role.clone(),
                service_master_number: index
                    .service_master_for(&person.role)
                    .unwrap_or_default()
                    .to_string(),
                hours,
                wo_number: block.wo_number.clone(),
                op_number: block.op_number.clone(),
                work_center: block.work_center.clone(),
                po_number: purchase_order.po_number.clone(),
                po_item: purchase_order.po_item.clone(),
            });
        }
    }

    if lines.is_empty() {
        return Err(TimesheetError::NoValidLines);
    }

    tracing::debug!(
        "Assembled {} export lines for {} on {}",
        lines.len(),
        company,
        date_iso
    );
    Ok(lines)
}

fn is_complete(block: &WorkOrderBlock) -> bool {
    !block.wo_number.trim().is_empty()
        && !block.op_number.trim().is_empty()
        && !block.work_center.trim().is_empty()
}

/// A row with neither person nor hours is the form's trailing blank row.
fn is_placeholder(row: &EntryRow) -> bool {
    row.employee_name.trim().is_empty() && row.hours.trim().is_empty()
}

/// Strictly positive, finite hours.
pub fn parse_hours(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|h| h.is_finite() && *h > 0.0)
}

/// Hours as a running total sees them: anything unparseable counts as zero.
fn lenient_hours(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|h| h.is_finite())
        .unwrap_or(0.0)
}

/// Sum of hours on rows that name a person.
pub fn block_total(block: &WorkOrderBlock) -> f64 {
    block
        .rows
        .iter()
        .filter(|row| !row.employee_name.trim().is_empty())
        .map(|row| lenient_hours(&row.hours))
        .sum()
}

pub fn grand_total(blocks: &[WorkOrderBlock]) -> f64 {
    blocks.iter().map(block_total).sum()
}
