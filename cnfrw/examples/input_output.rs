use cnfrw::cnf::{CnfReader, LazyCnfWriter, Summary};
use cnfrw::literal::Literal;
use cnfrw::pog::PogWriter;

fn main() {
    // Encode "exactly one of a, b, c" while allocating the variables on the fly.
    let mut cnf = LazyCnfWriter::new(Vec::new());
    let vars: Vec<Literal> = cnf.new_variables(3).into_iter().map(Literal::from).collect();
    cnf.do_comment("at least one");
    cnf.do_clause(vars.clone());
    cnf.do_comment("at most one");
    for (i, a) in vars.iter().enumerate() {
        for b in &vars[i + 1..] {
            cnf.do_clause(vec![-*a, -*b]);
        }
    }
    let bytes = cnf.finish().unwrap();

    println!("CNF:\n{}", String::from_utf8_lossy(&bytes));

    let doc = CnfReader::default().read(&mut bytes.as_slice()).unwrap();
    println!("{}", Summary::new("exactly-one", &doc));

    // Its three models as a POG: one conjunction per model under a disjunction.
    let mut pog = PogWriter::new(doc.nvar(), std::io::stdout());
    let mut models = Vec::new();
    for (i, var) in vars.iter().enumerate() {
        let args: Vec<Literal> = vars
            .iter()
            .enumerate()
            .map(|(j, other)| if i == j { *var } else { -*other })
            .collect();
        models.push(Literal::from(pog.do_and(&args).unwrap()));
    }
    let root = pog.do_or(&models).unwrap();
    pog.do_root(Literal::from(root)).unwrap();
    pog.finish().unwrap();
}
