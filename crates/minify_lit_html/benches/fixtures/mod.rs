macro_rules! input {
    ($name: literal) => {
        ($name, include_str!(concat!("./", $name)))
    };
}

pub const FIXTURES: [(&str, &str); 3] = [
    input!("counter.js"),
    input!("todo_list.js"),
    input!("no_templates.js"),
];
