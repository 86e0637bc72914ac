use crate::IR::ir_edge::EdgeId;
use crate::IR::ir_graph::IR;
use crate::IR::reaction_node::ReactionId;
use crate::error::Reb2SacResult;
use nalgebra::DMatrix;
use prettytable::{Cell, Row, Table};

impl IR {
    fn side_of_equation(&self, edges: Vec<EdgeId>) -> Reb2SacResult<String> {
        if edges.is_empty() {
            return Ok("∅".to_string());
        }
        let mut terms = Vec::new();
        for e in edges {
            let edge = self.edge(e)?;
            let name = self.species_name(edge.species());
            if edge.stoichiometry() == 1.0 {
                terms.push(name);
            } else {
                terms.push(format!("{} {}", edge.stoichiometry(), name));
            }
        }
        Ok(terms.join(" + "))
    }

    /// `2 A + B -> C` (`<->` for reversible reactions), modifiers after a semicolon
    pub fn reaction_equation(&self, id: ReactionId) -> Reb2SacResult<String> {
        let reaction = self.reaction(id)?;
        let arrow = if reaction.reversible { "<->" } else { "->" };
        let mut equation = format!(
            "{} {} {}",
            self.side_of_equation(self.reactant_edges(id))?,
            arrow,
            self.side_of_equation(self.product_edges(id))?
        );
        let modifiers = self.modifier_edges(id);
        if !modifiers.is_empty() {
            let names = modifiers
                .into_iter()
                .map(|e| Ok(self.species_name(self.species_in_edge(e)?)))
                .collect::<Reb2SacResult<Vec<String>>>()?;
            equation.push_str(&format!("; {}", names.join(", ")));
        }
        Ok(equation)
    }

    /// Net stoichiometry matrix: one row per species, one column per reaction (in IR
    /// order), products counted positive and reactants negative. Modifiers do not count.
    pub fn stoichiometry_matrix(&self) -> Reb2SacResult<DMatrix<f64>> {
        let species = self.species_ids();
        let reactions = self.reaction_ids();
        let mut matrix = DMatrix::zeros(species.len(), reactions.len());
        for (j, reaction) in reactions.iter().enumerate() {
            for e in self.reactant_edges(*reaction) {
                let edge = self.edge(e)?;
                if let Some(i) = species.iter().position(|s| *s == edge.species()) {
                    matrix[(i, j)] -= edge.stoichiometry();
                }
            }
            for e in self.product_edges(*reaction) {
                let edge = self.edge(e)?;
                if let Some(i) = species.iter().position(|s| *s == edge.species()) {
                    matrix[(i, j)] += edge.stoichiometry();
                }
            }
        }
        Ok(matrix)
    }

    pub fn pretty_print(&self) -> Reb2SacResult<()> {
        println!("\n___________MODEL {}___________", self.name);
        let mut species_table = Table::new();
        species_table.add_row(Row::new(vec![
            Cell::new("species"),
            Cell::new("compartment"),
            Cell::new("initial"),
            Cell::new("boundary"),
            Cell::new("fast"),
        ]));
        for id in self.species_ids() {
            let species = self.species(id)?;
            let initial = if species.initial_quantity.is_amount() {
                format!("amount {}", species.initial_quantity.value())
            } else {
                format!("concentration {}", species.initial_quantity.value())
            };
            species_table.add_row(Row::new(vec![
                Cell::new(&species.name),
                Cell::new(species.compartment.as_deref().unwrap_or("-")),
                Cell::new(&initial),
                Cell::new(&species.boundary_condition.to_string()),
                Cell::new(&species.fast.to_string()),
            ]));
        }
        species_table.printstd();

        let mut reaction_table = Table::new();
        reaction_table.add_row(Row::new(vec![
            Cell::new("reaction"),
            Cell::new("equation"),
            Cell::new("kinetic law"),
        ]));
        for id in self.reaction_ids() {
            let reaction = self.reaction(id)?;
            reaction_table.add_row(Row::new(vec![
                Cell::new(&reaction.name),
                Cell::new(&self.reaction_equation(id)?),
                Cell::new(&self.law_to_string(reaction.kinetic_law())),
            ]));
        }
        reaction_table.printstd();
        Ok(())
    }
}
